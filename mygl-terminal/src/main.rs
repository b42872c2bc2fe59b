//! MyGL Terminal Viewer - Rotating Cube
//!
//! Controls:
//!   - Left drag / arrow keys: rotate
//!   - Middle drag: pan
//!   - Right drag / wheel / +,-: zoom
//!   - R: reset the view
//!   - Q/ESC: quit
//!
//! Diagnostics go to stderr; set `RUST_LOG` (default `warn`) and redirect
//! stderr to a file to keep them off the drawing.

use anyhow::{Context, Result};
use clap::Parser;
use mygl_core::GlContext;
use mygl_terminal::{format_matrix, frame_matrices, Args, TerminalApp, ViewState};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    tracing::info!(?config, "starting viewer");

    if args.print_matrices {
        let mut ctx = GlContext::new();
        let frame = frame_matrices(&mut ctx, &ViewState::default(), &config, args.aspect)
            .context("failed to build the default view")?;
        println!("projection:\n{}", format_matrix(&frame.projection));
        println!("model-view:\n{}", format_matrix(&frame.model_view));
        return Ok(());
    }

    let mut app = TerminalApp::new(config).context("failed to query the terminal size")?;
    app.run().context("terminal I/O failed")?;
    Ok(())
}
