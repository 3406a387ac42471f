//! One-shot commands: import, list, delete, config.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::library::{Catalog, Track, collect_importable, display_from_fields, is_supported};

fn describe(track: &Track, settings: &Settings) -> String {
    display_from_fields(
        track,
        &settings.library.display_fields,
        &settings.library.display_separator,
    )
}

pub fn import(
    catalog: &Catalog,
    settings: &Settings,
    inputs: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    for input in inputs.iter().map(PathBuf::as_path) {
        if !input.is_dir() && !is_supported(input, &settings.library) {
            println!("skipping unsupported file: {}", input.display());
        }
    }

    let files = collect_importable(inputs, &settings.library);
    if files.is_empty() {
        println!("No supported music files found");
        return Ok(());
    }

    println!("Importing {} file(s) into {}", files.len(), catalog.music_dir().display());
    let added = catalog.add(&files);
    for t in &added {
        println!("  + {}", describe(t, settings));
    }
    println!(
        "Imported {} of {} file(s); library now holds {} track(s)",
        added.len(),
        files.len(),
        catalog.len()
    );
    Ok(())
}

pub fn list(catalog: &Catalog, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let tracks = catalog.list_all();
    if tracks.is_empty() {
        println!("Library is empty ({})", catalog.base_dir().display());
        return Ok(());
    }
    for t in &tracks {
        println!("{:>5}  {}", t.id, describe(t, settings));
    }
    println!("{} track(s)", tracks.len());
    Ok(())
}

pub fn delete(catalog: &Catalog, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let title = catalog.get_by_id(id).map(|t| t.title);
    if catalog.delete(id) {
        println!("Deleted #{id} ({})", title.unwrap_or_default());
        Ok(())
    } else if title.is_none() {
        Err(format!("no track #{id}").into())
    } else {
        Err(format!("failed to delete #{id}; see the log").into())
    }
}

pub fn print_config(settings: &Settings, source: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(p) = source {
        println!("# config file: {}", p.display());
    }
    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}
