//! CLI logic for the Valnet process graph tool.
//!
//! Reads a value network export, lays out the selected part of it and
//! writes the drawing as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use valnet::{GraphBuilder, ValnetError, config::AppConfig, shell::Viewport, source::Scope};

/// Run the Valnet CLI application
///
/// This function processes the input export through the Valnet pipeline
/// and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ValnetError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed exports, unknown scopes and invalid dates
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ValnetError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing value network"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let scope: Scope = args.scope.parse()?;

    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let network = builder.load(&source)?;
    let mut graph = builder.assemble(&network, &scope)?;
    builder.layout(&mut graph)?;
    let svg = builder.render_svg(&graph, &Viewport::new())?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// Command-line layout settings win over the configuration file.
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    let layout = config.layout_mut();
    if let Some(axes) = &args.axes {
        debug!(axes; "Overriding layout axes");
        layout.set_axes(axes.as_str());
    }
    if let Some(iterations) = args.iterations {
        debug!(iterations; "Overriding layout iterations");
        layout.set_iterations(iterations);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_overrides_replace_layout_settings() {
        let args = Args::parse_from(["valnet", "in.json", "--axes", "both", "--iterations", "7"]);
        let mut config = AppConfig::default();

        apply_overrides(&mut config, &args);

        assert_eq!(config.layout().iterations(), 7);
        assert_eq!(config.layout().axes().unwrap(), valnet::geometry::Axes::BOTH);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = Args::parse_from(["valnet", "in.json"]);
        let mut config = AppConfig::default();

        apply_overrides(&mut config, &args);

        assert_eq!(config.layout().iterations(), 50);
        assert_eq!(config.layout().axes().unwrap(), valnet::geometry::Axes::Y);
    }

    #[test]
    fn test_invalid_scope_is_reported() {
        let args = Args::parse_from(["valnet", "missing.json", "--scope", "team:1"]);
        let err = run(&args).unwrap_err();
        assert!(matches!(err, ValnetError::Source { .. }));
    }
}
