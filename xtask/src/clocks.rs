//! Print the divider settings the driver would pick for common rates.

use anyhow::{Context, Result};
use colored::Colorize;
use i2s::{solve, ClockPresets, ClockRequest};
use platform::{ChannelMode, ClockBase, WordWidth};

/// Frame rates worth knowing about.
const COMMON_RATES_HZ: [u32; 6] = [8_000, 16_000, 32_000, 44_100, 48_000, 96_000];

/// MCLK requested per frame, the usual codec oversampling ratio.
const MCLK_PER_FRAME: u32 = 256;

fn base_name(base: ClockBase) -> &'static str {
    match base {
        ClockBase::Audio48k => "48k",
        ClockBase::Audio44k1 => "44.1k",
    }
}

/// Signed error of `achieved` against `wanted`, in parts per million.
fn ppm(achieved: u32, wanted: u32) -> f64 {
    if wanted == 0 {
        return 0.0;
    }
    (f64::from(achieved) - f64::from(wanted)) / f64::from(wanted) * 1e6
}

pub fn run(bits: u32, mono: bool) -> Result<()> {
    let word_width = WordWidth::try_from(bits)
        .ok()
        .with_context(|| format!("unsupported word width {bits}, expected 8, 16 or 32"))?;
    let channels = if mono {
        ChannelMode::Mono
    } else {
        ChannelMode::Stereo
    };
    let presets = ClockPresets::default();

    println!();
    println!(
        "{}",
        format!(
            "⏱  Divider table ({bits}-bit, {})",
            if mono { "mono" } else { "stereo" }
        )
        .cyan()
        .bold()
    );
    println!();
    println!(
        "{}",
        format!(
            "  {:>8}  {:>10}  {:>9}  {:>9}  {:>7}  {:>8}  {:>10}",
            "fs", "MCLK req", "base", "num/den", "bitrate", "fs out", "error ppm"
        )
        .dimmed()
    );

    for rate in COMMON_RATES_HZ {
        let request = ClockRequest {
            master_clock_hz: rate.saturating_mul(MCLK_PER_FRAME),
            sample_rate_hz: rate,
            word_width,
            channels,
        };
        let solution = solve(&request, &presets);
        let achieved = solution.sample_rate_hz(word_width, channels);
        let error = ppm(achieved, rate);

        let line = format!(
            "  {:>8}  {:>10}  {:>9}  {:>9}  {:>7}  {:>8}  {:>+10.1}",
            rate,
            request.master_clock_hz,
            base_name(solution.base),
            format!("{}/{}", solution.numerator, solution.denominator),
            solution.bitrate,
            achieved,
            error
        );
        // 1000 ppm is where most codecs start to complain
        if error.abs() < 1000.0 {
            println!("{}", line.green());
        } else {
            println!("{}", line.yellow());
        }
    }
    println!();

    Ok(())
}
