//! IFF container commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use sims_iff::strings::DEFAULT_LANGUAGE;
use sims_iff::{ChunkKind, Iff, LoadOptions};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{format_bytes, format_guid, push_row, titled_table};

#[derive(Subcommand)]
pub enum IffCommands {
    /// Show a summary of an IFF container
    Info {
        /// Path to the IFF file
        file: PathBuf,

        /// Accept files without the container magic string
        #[arg(long)]
        lenient: bool,
    },

    /// List every chunk in the container
    List {
        /// Path to the IFF file
        file: PathBuf,

        /// Only list chunks of this type (e.g. SPR2, STR#, OBJD)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Print string tables
    Strings {
        /// Path to the IFF file
        file: PathBuf,

        /// Only print the table with this id
        #[arg(long)]
        id: Option<u16>,

        /// Language code to print
        #[arg(short, long, default_value_t = DEFAULT_LANGUAGE)]
        language: u8,
    },

    /// List object definitions
    Objects {
        /// Path to the IFF file
        file: PathBuf,
    },

    /// Export sprite frames as PNG images
    ExportSprite {
        /// Path to the IFF file
        file: PathBuf,

        /// Sprite id
        id: u16,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Only export this frame
        #[arg(short, long)]
        frame: Option<usize>,

        /// Also export depth buffers as grayscale images
        #[arg(long)]
        depth: bool,
    },

    /// Export an embedded bitmap
    ExportBitmap {
        /// Path to the IFF file
        file: PathBuf,

        /// Bitmap id
        id: u16,

        /// Output image path (format chosen by extension)
        output: PathBuf,
    },
}

pub fn execute(command: IffCommands) -> Result<()> {
    match command {
        IffCommands::Info { file, lenient } => info(&file, lenient),
        IffCommands::List { file, kind } => list(&file, kind.as_deref()),
        IffCommands::Strings { file, id, language } => strings(&file, id, language),
        IffCommands::Objects { file } => objects(&file),
        IffCommands::ExportSprite {
            file,
            id,
            output,
            frame,
            depth,
        } => export_sprite(&file, id, &output, frame, depth),
        IffCommands::ExportBitmap { file, id, output } => export_bitmap(&file, id, &output),
    }
}

fn open(file: &Path) -> Result<Iff> {
    Iff::open(file).with_context(|| format!("Failed to open IFF file: {}", file.display()))
}

fn parse_kind(tag: &str) -> Result<ChunkKind> {
    let trimmed = tag.trim_end_matches(['#', '\0', ' ']);
    match ChunkKind::from_tag(trimmed) {
        Some(kind) => Ok(kind),
        None => bail!("Unknown chunk type: {tag}"),
    }
}

fn info(file: &Path, lenient: bool) -> Result<()> {
    let data =
        fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    let options = LoadOptions::new().strict_magic(!lenient);
    let Some(iff) = Iff::load_with(&data, &options)
        .with_context(|| format!("Failed to parse IFF file: {}", file.display()))?
    else {
        println!("{}: not an IFF container", file.display());
        return Ok(());
    };

    println!("IFF File Information: {}", file.display());
    println!("{}", "=".repeat(50));
    println!("File size: {}", format_bytes(data.len() as u64));
    println!("Chunks: {}", iff.chunks().len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for chunk in iff.chunks() {
        *counts.entry(chunk.kind.as_tag()).or_default() += 1;
    }
    for (tag, count) in &counts {
        println!("  {tag:<5} {count}");
    }

    println!();
    println!("Objects: {}", iff.objects().len());
    println!(
        "Multi-tile: {}",
        if iff.is_multi_tile() { "yes" } else { "no" }
    );
    if let Some(master) = iff.master_object() {
        println!(
            "Master object: #{} (GUID {})",
            master.chunk_id,
            format_guid(master.guid())
        );
    }

    Ok(())
}

fn list(file: &Path, kind: Option<&str>) -> Result<()> {
    let iff = open(file)?;
    let filter = kind.map(parse_kind).transpose()?;

    let mut table = titled_table(&["Type", "ID", "Size", "Offset", "Label"]);
    let mut shown = 0usize;
    for chunk in iff.chunks() {
        if filter.is_some_and(|k| k != chunk.kind) {
            continue;
        }
        push_row(
            &mut table,
            [
                chunk.kind.to_string(),
                chunk.id.to_string(),
                format_bytes(u64::from(chunk.size)),
                format!("0x{:X}", chunk.offset),
                chunk.label.clone(),
            ],
        );
        shown += 1;
    }

    table.printstd();
    println!("{shown} chunk(s)");
    Ok(())
}

fn strings(file: &Path, id: Option<u16>, language: u8) -> Result<()> {
    let iff = open(file)?;

    let mut tables: Vec<_> = iff
        .string_tables()
        .filter(|(table_id, _)| id.is_none_or(|wanted| wanted == *table_id))
        .collect();
    if tables.is_empty() {
        match id {
            Some(id) => bail!("No string table with id {id}"),
            None => {
                println!("No string tables");
                return Ok(());
            }
        }
    }
    tables.sort_by_key(|(table_id, table)| (table.kind.as_tag(), *table_id));

    for (table_id, table) in tables {
        println!("{} #{} ({:?})", table.kind, table_id, table.format);
        let entries = table.strings(language);
        if entries.is_empty() {
            println!("  no strings for language {language}");
            continue;
        }
        let mut out = titled_table(&["#", "Value", "Comment"]);
        for (index, entry) in entries.iter().enumerate() {
            push_row(
                &mut out,
                [index.to_string(), entry.value.clone(), entry.comment.clone()],
            );
        }
        out.printstd();
    }
    Ok(())
}

fn objects(file: &Path) -> Result<()> {
    let iff = open(file)?;
    if iff.objects().is_empty() {
        println!("No object definitions");
        return Ok(());
    }

    let mut table = titled_table(&["ID", "GUID", "Name", "Price", "Master", "Sub", "Role"]);
    for object in iff.objects() {
        let name = iff
            .string_table_of(ChunkKind::Ctss, object.catalog_strings_id())
            .ok()
            .and_then(|t| t.get(DEFAULT_LANGUAGE, 0))
            .unwrap_or_default()
            .to_string();
        let role = if !object.is_multi_tile() {
            "single"
        } else if object.is_master() {
            "master"
        } else {
            "tile"
        };
        push_row(
            &mut table,
            [
                object.chunk_id.to_string(),
                format_guid(object.guid()),
                name,
                object.price().to_string(),
                object.master_id().to_string(),
                object.sub_index().to_string(),
                role.to_string(),
            ],
        );
    }
    table.printstd();
    Ok(())
}

fn export_sprite(
    file: &Path,
    id: u16,
    output: &Path,
    frame: Option<usize>,
    depth: bool,
) -> Result<()> {
    let iff = open(file)?;
    let sprite = iff
        .sprite(id)
        .with_context(|| format!("Sprite {id} not found in {}", file.display()))?;

    let frames = match frame {
        Some(index) => vec![(index, sprite.frame(index)?)],
        None => sprite.decode_all_frames()?.into_iter().enumerate().collect(),
    };

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create directory: {}", output.display()))?;

    let mut written = 0usize;
    for (index, decoded) in frames {
        if decoded.width() == 0 || decoded.height() == 0 {
            log::warn!("Skipping empty frame {index} of sprite {id}");
            continue;
        }
        let path = output.join(format!("{}_{id}_{index}.png", sprite.kind()));
        decoded
            .to_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {}", path.display());
        written += 1;

        if depth {
            if let Some(buffer) = decoded.depth_image() {
                let path = output.join(format!("{}_{id}_{index}_depth.png", sprite.kind()));
                buffer
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Wrote {}", path.display());
            }
        }
    }

    println!(
        "Exported {written} frame(s) of {} {id} to {}",
        sprite.kind(),
        output.display()
    );
    Ok(())
}

fn export_bitmap(file: &Path, id: u16, output: &Path) -> Result<()> {
    let iff = open(file)?;
    let bitmap = iff
        .bitmap(id)
        .with_context(|| format!("Bitmap {id} not found in {}", file.display()))?;
    let image = bitmap
        .decode_image()
        .with_context(|| format!("Failed to decode bitmap {id}"))?;
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Exported {} {id} ({}x{}) to {}",
        bitmap.kind,
        image.width(),
        image.height(),
        output.display()
    );
    Ok(())
}
