use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point2;

use crate::render::PaletteChoice;
use crate::scene::SceneBounds;

/// Parse bounds string in format "min_x,min_y,max_x,max_y"
fn parse_bounds(s: &str) -> Result<SceneBounds, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err("Bounds must be in format 'min_x,min_y,max_x,max_y'".to_string());
    }

    let values = parts
        .iter()
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| "Invalid bounds value".to_string())?;

    if values[0] >= values[2] || values[1] >= values[3] {
        return Err("Bounds minimum must be below maximum".to_string());
    }

    Ok(SceneBounds::new(
        Point2::new(values[0], values[1]),
        Point2::new(values[2], values[3]),
    ))
}

/// Arguments for tracing a scene file
#[derive(Parser, Debug, Clone)]
pub struct TraceArgs {
    /// Scene JSON file
    pub scene: PathBuf,

    /// Bench configuration JSON file (defaults are used for missing fields)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Include render hints for every segment
    #[arg(long, default_value_t = false)]
    pub render: bool,

    /// Colour strategy for render hints, overrides the config file
    #[arg(long, value_enum)]
    pub palette: Option<PaletteChoice>,

    /// Override the bounce limit per branch
    #[arg(long)]
    pub max_bounces: Option<usize>,

    /// Override scene bounds (format: "min_x,min_y,max_x,max_y")
    #[arg(long, value_parser = parse_bounds)]
    pub bounds: Option<SceneBounds>,

    /// Print sensor readings only
    #[arg(long, default_value_t = false)]
    pub sensors_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        let b = parse_bounds("-5, -5, 5, 10").unwrap();
        assert_eq!(b.min, Point2::new(-5.0, -5.0));
        assert_eq!(b.max, Point2::new(5.0, 10.0));
        assert!(parse_bounds("1,2,3").is_err());
        assert!(parse_bounds("a,0,1,1").is_err());
        assert!(parse_bounds("5,0,1,1").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let args = TraceArgs::parse_from(["trace_scene", "scene.json", "--render", "--palette", "hue"]);
        assert_eq!(args.scene, PathBuf::from("scene.json"));
        assert!(args.render);
        assert_eq!(args.palette, Some(PaletteChoice::Hue));
        assert!(args.config.is_none());
    }
}
