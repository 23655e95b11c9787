use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use eframe::egui::{Vec2, vec2};
use log::LevelFilter;

use crate::catalog::{Catalog, DatasetId};
use crate::scene::SceneStyle;
use crate::simulation::ForceConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Directory the catalog's dataset paths are relative to.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
    /// JSON catalog of categories and diagrams; a built-in table is used otherwise.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[arg(long, default_value_t = 960.0)]
    pub width: f32,
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,
    #[arg(long, value_enum, default_value_t = Preset::Annotated)]
    pub preset: Preset,
    #[arg(long, default_value_t = 20.0)]
    pub node_radius: f32,
    #[arg(long, default_value_t = 12.0)]
    pub arrow_width: f32,
    /// Dataset to open on startup, as `category/diagram`.
    #[arg(long)]
    pub dataset: Option<String>,
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Arrowheads and labels offset beside the link.
    #[default]
    Annotated,
    /// Longer, stronger-spaced links; plain lines with centered labels.
    Plain,
    /// Short links and weak repulsion for dense graphs.
    Compact,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Annotated, Preset::Plain, Preset::Compact];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Annotated => "Annotated",
            Preset::Plain => "Plain",
            Preset::Compact => "Compact",
        }
    }

    pub fn force_config(self, canvas: Vec2) -> ForceConfig {
        let (charge, link_distance) = match self {
            Preset::Annotated => (-300.0, 100.0),
            Preset::Plain => (-400.0, 150.0),
            Preset::Compact => (-120.0, 60.0),
        };
        ForceConfig {
            charge,
            link_distance,
            ..ForceConfig::centered_on(canvas.x, canvas.y)
        }
    }

    pub fn scene_style(self, node_radius: f32, arrow_width: f32) -> SceneStyle {
        let annotated = !matches!(self, Preset::Plain);
        SceneStyle {
            node_radius,
            arrow_width,
            arrows: annotated,
            offset_labels: annotated,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub data_dir: PathBuf,
    pub catalog: Catalog,
    pub canvas: Vec2,
    pub preset: Preset,
    pub node_radius: f32,
    pub arrow_width: f32,
    pub initial_dataset: Option<DatasetId>,
}

impl ViewerConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !(positive(args.width) && positive(args.height)) {
            return Err(anyhow!(
                "canvas size must be positive and finite, got {}x{}",
                args.width,
                args.height
            ));
        }
        let non_negative = |value: f32| value.is_finite() && value >= 0.0;
        if !(non_negative(args.node_radius) && non_negative(args.arrow_width)) {
            return Err(anyhow!(
                "node radius and arrow width must be finite and not negative"
            ));
        }

        let catalog = match &args.catalog {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin(),
        };

        let initial_dataset = args
            .dataset
            .as_deref()
            .map(DatasetId::parse)
            .transpose()?;
        if let Some(dataset) = &initial_dataset {
            catalog.resolve(dataset)?;
        }

        Ok(Self {
            data_dir: args.data_dir.clone(),
            catalog,
            canvas: vec2(args.width, args.height),
            preset: args.preset,
            node_radius: args.node_radius,
            arrow_width: args.arrow_width,
            initial_dataset,
        })
    }
}
