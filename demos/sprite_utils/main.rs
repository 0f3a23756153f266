//! Sprite pipeline CLI Utility
//!
//! A command-line tool for pulling character sprites out of a cartridge image,
//! importing images as tile-packed sprites and previewing playback.
//!
//! # Features
//!
//! - **info**: Display cartridge information and the character table
//! - **palettes**: Warm the palette cache and dump every character palette
//! - **export**: Decode a character's field or battle frames to PNG files
//! - **import**: Quantize an image into a sprite payload and palette record
//! - **play**: Simulate playback of a character's field frames
//!
//! # Usage
//!
//! ```bash
//! # Show cartridge information
//! cargo run --example sprite_utils -- info ff3.smc
//!
//! # Dump all palettes as JSON
//! cargo run --example sprite_utils -- palettes ff3.smc --json
//!
//! # Export Terra's field frames
//! cargo run --example sprite_utils -- export ff3.smc 0 -o terra/
//!
//! # Import an image as a battle sprite with Floyd-Steinberg dithering
//! cargo run --example sprite_utils -- import hero.png --kind battle --dither floyd-steinberg
//!
//! # Preview ping-pong playback at double speed
//! cargo run --example sprite_utils -- play ff3.smc 0 --mode ping-pong --speed 2.0
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use espers_rs::prelude::*;
use log::{info, warn};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "sprite_utils")]
#[command(author = "espers-rs project")]
#[command(version = "1.0")]
#[command(about = "Sprite utility - inspect cartridges, export and import sprites, preview playback", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Display cartridge information
	Info(RomArgs),
	/// Dump every character palette
	Palettes(PalettesArgs),
	/// Decode a character's frames to PNG files
	Export(ExportArgs),
	/// Convert an image into a sprite payload
	Import(ImportArgs),
	/// Simulate playback of a character's field frames
	Play(PlayArgs),
}

#[derive(Args)]
struct RomArgs {
	/// Cartridge image path; searched in the current directory when omitted
	#[arg(value_name = "ROM")]
	rom: Option<PathBuf>,
}

#[derive(Args)]
struct PalettesArgs {
	#[command(flatten)]
	rom: RomArgs,

	/// Print JSON instead of hex words
	#[arg(long)]
	json: bool,

	/// Warm-up worker count
	#[arg(short, long, default_value_t = 6)]
	workers: usize,
}

#[derive(Args)]
struct ExportArgs {
	/// Cartridge image path
	#[arg(value_name = "ROM")]
	rom: PathBuf,

	/// Character id (0-13)
	#[arg(value_name = "ID")]
	id: u8,

	/// Export the battle sprite instead of the field set
	#[arg(short, long)]
	battle: bool,

	/// Output directory (defaults to `character_<ID>/`)
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: Option<PathBuf>,

	/// Fail instead of substituting raw bytes for a bad block
	#[arg(long)]
	strict: bool,
}

#[derive(Args)]
struct ImportArgs {
	/// Source image (PNG, GIF, BMP or JPEG)
	#[arg(value_name = "IMAGE")]
	input: PathBuf,

	/// Target sprite kind
	#[arg(short, long, value_enum, default_value_t = KindArg::Character)]
	kind: KindArg,

	/// Dithering mode
	#[arg(short, long, value_enum, default_value_t = DitherArg::None)]
	dither: DitherArg,

	/// Maximum colors to extract
	#[arg(short, long, default_value_t = 15)]
	max_colors: usize,

	/// Compress the payload
	#[arg(short, long)]
	compress: bool,

	/// Output prefix (defaults to the input path without extension)
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct PlayArgs {
	/// Cartridge image path
	#[arg(value_name = "ROM")]
	rom: PathBuf,

	/// Character id (0-13)
	#[arg(value_name = "ID")]
	id: u8,

	/// Playback mode
	#[arg(short, long, value_enum, default_value_t = ModeArg::Loop)]
	mode: ModeArg,

	/// Duration of each frame in milliseconds
	#[arg(long, default_value_t = 120)]
	frame_ms: u32,

	/// Speed multiplier (0.5-2.0)
	#[arg(short, long, default_value_t = 1.0)]
	speed: f64,

	/// Number of simulated ticks
	#[arg(short, long, default_value_t = 60)]
	ticks: usize,

	/// Milliseconds per tick
	#[arg(long, default_value_t = 1000.0 / 60.0)]
	tick_ms: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
	Character,
	Battle,
	Portrait,
	Npc,
	Enemy,
	Overworld,
}

impl From<KindArg> for SpriteKind {
	fn from(kind: KindArg) -> Self {
		match kind {
			KindArg::Character => SpriteKind::Character,
			KindArg::Battle => SpriteKind::Battle,
			KindArg::Portrait => SpriteKind::Portrait,
			KindArg::Npc => SpriteKind::Npc,
			KindArg::Enemy => SpriteKind::Enemy,
			KindArg::Overworld => SpriteKind::Overworld,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
enum DitherArg {
	None,
	FloydSteinberg,
	Bayer,
}

impl From<DitherArg> for DitherMode {
	fn from(dither: DitherArg) -> Self {
		match dither {
			DitherArg::None => DitherMode::None,
			DitherArg::FloydSteinberg => DitherMode::FloydSteinberg,
			DitherArg::Bayer => DitherMode::Bayer,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
	Once,
	Loop,
	PingPong,
}

impl From<ModeArg> for PlaybackMode {
	fn from(mode: ModeArg) -> Self {
		match mode {
			ModeArg::Once => PlaybackMode::Once,
			ModeArg::Loop => PlaybackMode::Loop,
			ModeArg::PingPong => PlaybackMode::PingPong,
		}
	}
}

/// Palette record for JSON output
#[derive(Serialize)]
struct PaletteRecord {
	id: u8,
	name: &'static str,
	words: Vec<u16>,
	hex: String,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Palettes(args) => run_palettes(args),
		Command::Export(args) => run_export(args),
		Command::Import(args) => run_import(args),
		Command::Play(args) => run_play(args),
	}
}

fn load_rom(path: Option<&Path>) -> Result<CartridgeImage> {
	match path {
		Some(path) => {
			CartridgeImage::load(path).with_context(|| format!("Failed to load {}", path.display()))
		}
		None => CartridgeImage::discover(&[Path::new(".")]).context("No cartridge image found"),
	}
}

fn run_info(args: RomArgs) -> Result<()> {
	let rom = load_rom(args.rom.as_deref())?;
	println!("{rom}");
	println!("Title:   {}", rom.title());
	println!("Region:  {}", rom.region());
	println!("Header:  {}", if rom.has_header() { "stripped (512 bytes)" } else { "none" });
	println!("Size:    {} bytes", rom.len());
	println!();

	let extractor = AssetExtractor::new(Arc::new(rom));
	println!("{:>3}  {:<8} {:>8} {:>8} {:>8}", "ID", "Name", "Field", "Battle", "Palette");
	for c in extractor.character_table() {
		println!(
			"{:>3}  {:<8} {:08X} {:08X} {:08X}",
			c.id,
			c.name,
			c.field_offset(),
			c.battle_offset(),
			c.palette_offset()
		);
	}
	Ok(())
}

fn run_palettes(args: PalettesArgs) -> Result<()> {
	let rom = load_rom(args.rom.rom.as_deref())?;
	let config = ExtractConfig::default().with_concurrency(args.workers);
	let extractor = AssetExtractor::with_config(Arc::new(rom), config);

	let report = extractor.load_all_palettes_cached()?;
	info!("Loaded {} palettes ({} fallback)", report.loaded, report.failed);

	let mut records = Vec::new();
	for c in extractor.character_table() {
		let palette = extractor.palette_cached(c.id)?;
		records.push(PaletteRecord {
			id: c.id,
			name: c.name,
			words: palette.colors().iter().map(|color| color.to_word()).collect(),
			hex: hex::encode(palette.to_bytes()),
		});
	}

	if args.json {
		println!("{}", serde_json::to_string_pretty(&records)?);
	} else {
		for record in &records {
			println!("{:>3} {:<8} {}", record.id, record.name, record.hex);
		}
	}
	Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
	let rom = CartridgeImage::load(&args.rom)
		.with_context(|| format!("Failed to load {}", args.rom.display()))?;
	let config = if args.strict {
		ExtractConfig::strict()
	} else {
		ExtractConfig::default()
	};
	let extractor = AssetExtractor::with_config(Arc::new(rom), config);

	let extraction = if args.battle {
		extractor.extract_battle_sprite(args.id)?
	} else {
		extractor.extract_field_sprite(args.id)?
	};
	if extraction.used_fallback {
		println!("Warning: block did not decompress, exported raw bytes");
	}
	let sprite = extraction.value;

	let output = args.output.unwrap_or_else(|| PathBuf::from(format!("character_{}", args.id)));
	fs::create_dir_all(&output).with_context(|| format!("Failed to create {}", output.display()))?;

	for (index, frame) in codec::decode_all(&sprite)?.into_iter().enumerate() {
		let path = output.join(format!("frame_{index:03}.png"));
		frame.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
	}
	fs::write(output.join("palette.bin"), sprite.palette().to_bytes())?;

	println!("Exported {sprite} to {}", output.display());
	Ok(())
}

fn run_import(args: ImportArgs) -> Result<()> {
	let image = image::open(&args.input)
		.with_context(|| format!("Failed to open {}", args.input.display()))?
		.to_rgba8();

	let options = ImportOptions {
		dither: args.dither.into(),
		max_colors: args.max_colors,
		..ImportOptions::default()
	};
	let sprite = import_image(&image, args.kind.into(), &options);

	let payload = if args.compress {
		lz::compress(sprite.data())
	} else {
		sprite.data().to_vec()
	};

	let prefix = args.output.unwrap_or_else(|| args.input.with_extension(""));
	let payload_path = prefix.with_extension("bin");
	let palette_path = prefix.with_extension("pal");
	let preview_path = prefix.with_extension("preview.png");

	fs::write(&payload_path, &payload)?;
	fs::write(&palette_path, sprite.palette().to_bytes())?;
	codec::decode(&sprite)?.save(&preview_path)?;

	println!("Imported {sprite}");
	println!("Payload: {} ({} bytes)", payload_path.display(), payload.len());
	println!("Palette: {} ({})", palette_path.display(), hex::encode(sprite.palette().to_bytes()));
	println!("Preview: {}", preview_path.display());
	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	if args.frame_ms == 0 {
		bail!("--frame-ms must be greater than zero");
	}

	let rom = CartridgeImage::load(&args.rom)
		.with_context(|| format!("Failed to load {}", args.rom.display()))?;
	let extractor = AssetExtractor::new(Arc::new(rom));
	let extraction = extractor.field_sprite_cached(args.id)?;
	if extraction.used_fallback {
		warn!("Field block for character {} did not decompress, playing raw bytes", args.id);
	}
	let set = extraction.value;

	let mut frames = Vec::with_capacity(set.frame_count());
	for index in 0..set.frame_count() {
		let payload = set.frame_payload(index)?.into_owned();
		let frame = Sprite::new(set.kind(), 1, payload, *set.palette())?
			.with_id(index as u32)
			.with_name(format!("{} #{index}", set.name()));
		frames.push(Arc::new(frame));
	}
	let durations = vec![args.frame_ms; frames.len()];
	let sequence = AnimationSequence::from_frames(set.name(), frames, durations, args.mode.into())?;
	println!(
		"Playing {:?}: {} frames, {} ms, mode {}",
		sequence.name(),
		sequence.len(),
		sequence.total_duration(),
		sequence.mode()
	);

	let (tx, rx) = crossbeam_channel::unbounded();
	let mut controller = AnimationController::new(Arc::new(sequence))?;
	controller.set_speed(args.speed)?;
	controller.add_observer(tx);
	controller.play();

	for tick in 0..args.ticks {
		controller.advance(args.tick_ms);
		for event in rx.try_iter() {
			match event {
				PlaybackEvent::FrameChanged {
					current,
					..
				} => println!(
					"tick {tick:>4}  {:>8.1} ms  frame {current} ({:?})",
					controller.elapsed(),
					controller.direction()
				),
				PlaybackEvent::StateChanged {
					previous,
					current,
				} => println!("tick {tick:>4}  state {previous:?} -> {current:?}"),
				PlaybackEvent::Finished => println!("tick {tick:>4}  finished"),
			}
		}
		if controller.state() == PlaybackState::Stopped {
			break;
		}
	}
	println!("Final progress: {:.0}%", controller.progress() * 100.0);
	Ok(())
}
