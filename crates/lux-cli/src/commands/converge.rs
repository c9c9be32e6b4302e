//! Converge command
//!
//! Accumulates a frame sequence in a render session and writes the display
//! image, optionally with the HDR estimate. Frames whose resolution differs
//! from the previous one resize the session, which restarts accumulation.

use crate::{ConvergeArgs, LutInterp, io};
use anyhow::{Context, Result, bail};
use lux_accum::{FrameInput, PipelineSettings, RenderSession};
use lux_core::RgbaImage;
use lux_lut::Interpolation;
use tracing::{debug, info, trace};

fn build_settings(args: &ConvergeArgs) -> Result<PipelineSettings> {
    let mut settings = match &args.config {
        Some(path) => PipelineSettings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => PipelineSettings::default(),
    };

    // Command line overrides the settings file
    if let Some(stops) = args.exposure {
        settings.grading.exposure_compensation = stops;
    }
    if let Some(kelvin) = args.white_point {
        settings.grading.use_white_balance = true;
        settings.grading.white_point_kelvin = kelvin;
    }
    if args.lut.is_some() {
        settings.grading.use_lut = true;
    }
    if args.no_aa {
        settings.antialias.enabled = false;
    }
    Ok(settings.sanitized())
}

pub fn run(args: ConvergeArgs, verbose: u8) -> Result<()> {
    trace!(frames = args.frames.len(), output = %args.output.display(), "converge::run");

    let frames = super::expand_inputs(&args.frames)?;
    let Some(first_path) = frames.first() else {
        bail!("No input frames");
    };
    let settings = build_settings(&args)?;

    let lut = match &args.lut {
        Some(path) => {
            let interp = match args.lut_interp {
                LutInterp::Nearest => Interpolation::Nearest,
                LutInterp::Linear => Interpolation::Linear,
                LutInterp::Tetrahedral => Interpolation::Tetrahedral,
            };
            let lut = lux_lut::load_packed_png(path)
                .with_context(|| format!("Failed to load LUT: {}", path.display()))?;
            Some(lut.with_interpolation(interp))
        }
        None => None,
    };

    let first = io::read_exr(first_path)?;
    let (width, height) = first.dimensions();
    let mut session = RenderSession::new(width, height, settings)
        .with_context(|| format!("Failed to create {width}x{height} session"))?;
    session.set_lut(lut);
    let mut target = RgbaImage::new(width, height);

    info!(frames = frames.len(), width, height, "Accumulating");
    if verbose > 0 {
        println!("Accumulating {} frames at {}x{}", frames.len(), width, height);
    }

    let mut pending = Some(first);
    for path in &frames {
        let sample = match pending.take() {
            Some(img) => img,
            None => io::read_exr(path)?,
        };

        if sample.dimensions() != session.dimensions() {
            let (w, h) = sample.dimensions();
            info!(path = %path.display(), width = w, height = h, "Resolution changed, restarting");
            session
                .resize(w, h)
                .with_context(|| format!("Failed to resize session to {w}x{h}"))?;
            target = RgbaImage::new(w, h);
        }

        let stats = session
            .render_frame(&FrameInput::new(sample), &mut target)
            .with_context(|| format!("Failed to render frame: {}", path.display()))?;
        debug!(
            path = %path.display(),
            frame = stats.frame_index,
            samples = stats.sample_count,
            reset = stats.reset,
            "frame accumulated"
        );
    }

    io::write_png(&args.output, &target)?;
    info!(output = %args.output.display(), samples = session.sample_count(), "Wrote display image");

    if let Some(hdr) = &args.hdr_out {
        io::write_exr(hdr, &session.estimate())?;
        info!(output = %hdr.display(), "Wrote HDR estimate");
    }

    if verbose > 0 {
        println!("Done ({} samples).", session.sample_count());
    }

    Ok(())
}
