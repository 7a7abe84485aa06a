use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use obscura_core::{anonymize_bytes, BlurConfig, FaceRegion, MaskShape};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "obscura", about = "Anonymize detected faces in images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blur all detected faces in an image and write the result as PNG
    Blur {
        /// Source image (any format the decoder recognizes)
        input: PathBuf,
        /// Detector results JSON: an annotation array or a full response envelope
        #[arg(short, long)]
        regions: PathBuf,
        /// Output path for the anonymized PNG
        #[arg(short, long, default_value = "blurred-image.png")]
        output: PathBuf,
        /// Blur radius; drives pixelation block size and blur strength
        #[arg(long, default_value_t = 40)]
        radius: u32,
        /// Padding added around each detected face box
        #[arg(long, default_value_t = 20)]
        padding: u32,
        /// Clip shape for the anonymized patch
        #[arg(long, value_enum, default_value_t = ShapeArg::Ellipse)]
        shape: ShapeArg,
        /// Number of blur passes after pixelation
        #[arg(long, default_value_t = 3)]
        passes: u32,
        /// Process at most this many detected faces
        #[arg(long, default_value_t = 50)]
        max_faces: usize,
    },
    /// Inspect a detector results file: per-region geometry and usability
    Regions {
        /// Detector results JSON
        file: PathBuf,
        /// Image width the regions refer to
        #[arg(long)]
        width: u32,
        /// Image height the regions refer to
        #[arg(long)]
        height: u32,
        /// Padding to apply when reporting expanded rectangles
        #[arg(long, default_value_t = 20)]
        padding: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Ellipse,
    Rectangle,
}

impl From<ShapeArg> for MaskShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Ellipse => MaskShape::Ellipse,
            ShapeArg::Rectangle => MaskShape::RoundedRect,
        }
    }
}

/// Detector results on disk: either a bare annotation array or the full
/// response envelope as returned by the detection service.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegionsFile {
    Annotations(Vec<FaceRegion>),
    Envelope { responses: Vec<ResponseEntry> },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseEntry {
    #[serde(default)]
    face_annotations: Vec<FaceRegion>,
}

fn load_regions(path: &PathBuf) -> Result<Vec<FaceRegion>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading regions file {}", path.display()))?;
    let parsed: RegionsFile = serde_json::from_str(&data)
        .with_context(|| format!("parsing regions file {}", path.display()))?;
    Ok(match parsed {
        RegionsFile::Annotations(regions) => regions,
        RegionsFile::Envelope { responses } => responses
            .into_iter()
            .flat_map(|r| r.face_annotations)
            .collect(),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Blur {
            input,
            regions,
            output,
            radius,
            padding,
            shape,
            passes,
            max_faces,
        } => {
            if radius == 0 {
                bail!("--radius must be greater than 0");
            }
            if passes == 0 {
                bail!("--passes must be at least 1");
            }

            let source = fs::read(&input)
                .with_context(|| format!("reading image {}", input.display()))?;
            let mut faces = load_regions(&regions)?;
            if faces.len() > max_faces {
                tracing::warn!(
                    total = faces.len(),
                    max_faces,
                    "truncating detector results"
                );
                faces.truncate(max_faces);
            }

            let usable = faces.iter().filter(|f| f.bounding_box().is_some()).count();
            if usable == 0 {
                tracing::warn!("no usable faces in detector results; output will equal the input");
            }

            let config = BlurConfig {
                blur_radius: radius,
                padding,
                shape: shape.into(),
                blur_passes: passes,
            };
            let encoded = anonymize_bytes(&source, &faces, &config)
                .context("anonymization failed")?;

            fs::write(&output, &encoded)
                .with_context(|| format!("writing output {}", output.display()))?;
            println!(
                "{}: {} of {} face(s) anonymized -> {}",
                input.display(),
                usable,
                faces.len(),
                output.display()
            );
        }
        Commands::Regions {
            file,
            width,
            height,
            padding,
        } => {
            let faces = load_regions(&file)?;
            println!("{} region(s) in {}", faces.len(), file.display());
            for (index, face) in faces.iter().enumerate() {
                match face.bounding_box() {
                    Some(rect) => {
                        let expanded = obscura_core::region::expand(rect, padding, width, height);
                        match expanded {
                            Some(p) => println!(
                                "  #{index}: box ({}, {}) {}x{} -> padded ({}, {}) {}x{}",
                                rect.x, rect.y, rect.width, rect.height,
                                p.x, p.y, p.width, p.height
                            ),
                            None => println!(
                                "  #{index}: box ({}, {}) {}x{} -> outside {}x{} canvas, skipped",
                                rect.x, rect.y, rect.width, rect.height, width, height
                            ),
                        }
                    }
                    None => println!("  #{index}: no polygon with 4+ vertices, skipped"),
                }
            }
        }
    }

    Ok(())
}
