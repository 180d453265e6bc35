//! Sign command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{debug, info, warn};

use crate::utils;

/// Execute the sign command.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    image_path: PathBuf,
    metadata: Option<String>,
    metadata_file: Option<PathBuf>,
    output: Option<PathBuf>,
    timestamp: Option<u32>,
    no_sidecar: bool,
    quiet: bool,
) -> Result<()> {
    let metadata_bytes = match utils::load_metadata(metadata, metadata_file)? {
        Some(bytes) => bytes,
        None => bail!("signing requires a metadata payload (--metadata or --metadata-file)"),
    };

    // Decode to RGBA8; the signing core works on the raw pixel buffer.
    let decoded = image::open(&image_path)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?;
    let mut rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    info!(path = %image_path.display(), width, height, "Decoded image");

    let result = match timestamp {
        Some(ts) => pixseal_core::sign_image_at(
            &mut rgba,
            width,
            height,
            metadata_bytes.as_slice(),
            ts,
        )?,
        None => pixseal_core::sign_image(&mut rgba, width, height, metadata_bytes.as_slice())?,
    };

    debug!(
        regions = result.regions_signed.len(),
        timestamp = result.timestamp,
        "Embedded signature records"
    );

    // Re-encode losslessly; a lossy format would destroy the embedded bits.
    let output = output.unwrap_or_else(|| utils::build_output_path(&image_path));
    rgba.save(&output)
        .with_context(|| format!("Failed to write sealed image: {}", output.display()))?;

    info!(path = %output.display(), "Sealed image saved");

    if !no_sidecar {
        let sidecar_path = utils::build_sidecar_path(&output);
        let sidecar = serde_json::json!({
            "image": output.display().to_string(),
            "regions_signed": result.regions_signed,
            "timestamp": result.timestamp,
            "signed_at": utils::format_timestamp(result.timestamp),
            "metadata_digest": result.metadata_digest_hex(),
            "content_digest": result.content_digest_hex(),
            "metadata_digest_full": hex::encode(result.metadata_digest_full),
            "content_digest_full": hex::encode(result.content_digest_full),
        });
        let json = serde_json::to_string_pretty(&sidecar)
            .context("Failed to encode sidecar JSON")?;
        std::fs::write(&sidecar_path, json)
            .with_context(|| format!("Failed to write sidecar: {}", sidecar_path.display()))?;
        debug!(path = %sidecar_path.display(), "Sidecar saved");
    }

    if result.regions_signed.len() < pixseal_core::REGIONS.len() {
        warn!(
            signed = result.regions_signed.len(),
            "Not every region fit this image"
        );
        if !quiet {
            eprintln!(
                "{}",
                format!(
                    "Only {} of {} regions fit this image; crop tolerance is reduced.",
                    result.regions_signed.len(),
                    pixseal_core::REGIONS.len()
                )
                .yellow()
            );
        }
    }

    if !quiet {
        println!();
        println!("{}", "Image signed.".green().bold());
        println!();
        println!("   {} {}", "Sealed image:".dimmed(), output.display());
        println!(
            "   {} {}",
            "Regions:".dimmed(),
            result
                .regions_signed
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!(
            "   {} {}",
            "Signed at:".dimmed(),
            utils::format_timestamp(result.timestamp)
        );
        println!(
            "   {} {}",
            "Metadata digest:".dimmed(),
            result.metadata_digest_hex()
        );
        println!(
            "   {} {}",
            "Content digest:".dimmed(),
            result.content_digest_hex()
        );
    }

    Ok(())
}
