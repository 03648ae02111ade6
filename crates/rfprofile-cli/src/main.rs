//! RF Profile Command-Line Interface
//!
//! This CLI provides tools for:
//! - Listing the regulatory profiles and their limits
//! - Converting quantities between units
//! - Validating signal parameters against a profile
//! - Generating transmitted/received traces to JSON, CSV or raw f32 files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rfprofile_core::profile::{format_count, format_frequency, format_power};
use rfprofile_core::{
    validate, FrequencyUnit, GenerateOptions, GeneratorConfig, PhysicalQuantity, PowerUnit,
    Profile, ProfileLimits, SignalForm, SignalParameters, TimeUnit, Unit, WaveformSet,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "rfprofile")]
#[command(author, version, about = "Regulatory RF profile explorer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Signal fields shared by `validate` and `generate`
#[derive(clap::Args, Debug, Clone)]
struct FieldArgs {
    /// Country profile (mx, sg)
    #[arg(short, long)]
    profile: Profile,

    /// Carrier frequency, e.g. 98.5MHz or 3.5GHz
    #[arg(long)]
    frequency: Option<PhysicalQuantity<FrequencyUnit>>,

    /// Peak frequency deviation (FM), e.g. 75kHz
    #[arg(long)]
    deviation: Option<PhysicalQuantity<FrequencyUnit>>,

    /// Audio frequency (FM), e.g. 15kHz
    #[arg(long)]
    audio: Option<PhysicalQuantity<FrequencyUnit>>,

    /// Subcarrier spacing (OFDM), e.g. 30kHz
    #[arg(long)]
    spacing: Option<PhysicalQuantity<FrequencyUnit>>,

    /// Number of subcarriers (OFDM)
    #[arg(long)]
    subcarriers: Option<u32>,

    /// Transmit power, e.g. 10W or 500mW
    #[arg(long)]
    power: Option<PhysicalQuantity<PowerUnit>>,
}

impl FieldArgs {
    fn to_form(&self) -> SignalForm {
        let mut form = SignalForm::new(self.profile);
        if let Some(q) = self.frequency {
            form.frequency = q;
        }
        if let Some(q) = self.deviation {
            form.frequency_deviation = q;
        }
        if let Some(q) = self.audio {
            form.audio_frequency = q;
        }
        if let Some(q) = self.spacing {
            form.subcarrier_spacing = q;
        }
        form.subcarrier_count = self.subcarriers;
        if let Some(q) = self.power {
            form.power = q;
        }
        form
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List profiles, their regulatory limits and accepted units
    Profiles,

    /// Convert a quantity to another unit of the same kind
    Convert {
        /// Quantity to convert, e.g. 98.5MHz, 500mW, 4us
        quantity: String,

        /// Target unit symbol
        #[arg(long)]
        to: String,
    },

    /// Check signal parameters against a profile
    Validate {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Validate parameters and write the generated traces
    Generate {
        #[command(flatten)]
        fields: FieldArgs,

        /// Skip the channel-impaired trace
        #[arg(long)]
        no_received: bool,

        /// Override the observation window, e.g. 2ms or 1us
        #[arg(long)]
        window: Option<PhysicalQuantity<TimeUnit>>,

        /// JSON file with sampling/channel overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (json, csv, f32)
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file (or - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },
}

fn cmd_profiles() -> Result<()> {
    for profile in Profile::ALL {
        println!("{} ({}) - {}", profile.label(), profile.code(), profile.modulation());
        match profile.limits() {
            ProfileLimits::Fm(l) => {
                println!("  carrier:    {}", l.carrier.describe(format_frequency));
                println!("  deviation:  {}", l.deviation.describe(format_frequency));
                println!("  audio:      {}", l.audio.describe(format_frequency));
                println!("  power:      {}", l.power.describe(format_power));
                println!("  bandwidth:  at most {} (Carson)", format_frequency(l.max_bandwidth));
            }
            ProfileLimits::Ofdm(l) => {
                println!("  carrier:     {}", l.carrier.describe(format_frequency));
                println!("  spacing:     {}", l.spacing.describe(format_frequency));
                println!("  subcarriers: {}", l.subcarriers.describe(format_count));
                println!("  power:       {}", l.power.describe(format_power));
            }
        }
        println!();
    }

    println!("Units:");
    print_unit_table::<FrequencyUnit>();
    print_unit_table::<PowerUnit>();
    print_unit_table::<TimeUnit>();
    Ok(())
}

fn print_unit_table<U: Unit>() {
    let symbols: Vec<String> = U::all()
        .iter()
        .map(|u| format!("{} (x{})", u.symbol(), u.factor()))
        .collect();
    println!("  {:<10} {}", U::CATEGORY, symbols.join(", "));
}

/// Parse `quantity` in the category of `to` and express it in that unit
fn convert_quantity(quantity: &str, to: &str) -> Result<String> {
    fn convert<U: Unit>(quantity: &str, to: U) -> Result<String> {
        let q: PhysicalQuantity<U> = quantity
            .parse()
            .with_context(|| format!("Invalid {} quantity '{}'", U::CATEGORY, quantity))?;
        Ok(q.convert_to(to).to_string())
    }

    if let Ok(unit) = to.parse::<FrequencyUnit>() {
        convert(quantity, unit)
    } else if let Ok(unit) = to.parse::<PowerUnit>() {
        convert(quantity, unit)
    } else if let Ok(unit) = to.parse::<TimeUnit>() {
        convert(quantity, unit)
    } else {
        bail!("Unknown target unit '{}'", to)
    }
}

fn cmd_convert(quantity: String, to: String) -> Result<()> {
    let converted = convert_quantity(&quantity, &to)?;
    println!("{}", converted);
    Ok(())
}

/// Human-readable summary of accepted parameters
fn describe_params(params: &SignalParameters) -> Vec<String> {
    let mut lines = vec![
        format!("profile:   {}", params.profile()),
        format!("carrier:   {}", format_frequency(params.frequency())),
        format!("power:     {}", format_power(params.power())),
    ];
    match params {
        SignalParameters::Fm(p) => {
            lines.push(format!("deviation: {}", format_frequency(p.frequency_deviation())));
            lines.push(format!("audio:     {}", format_frequency(p.audio_frequency())));
            lines.push(format!("beta:      {:.3}", p.modulation_index()));
            lines.push(format!("carson bw: {}", format_frequency(p.carson_bandwidth())));
        }
        SignalParameters::Ofdm(p) => {
            lines.push(format!("spacing:   {}", format_frequency(p.subcarrier_spacing())));
            lines.push(format!("tones:     {}", p.subcarrier_count()));
            lines.push(format!("occupied:  {}", format_frequency(p.occupied_bandwidth())));
        }
    }
    lines
}

fn check_fields(fields: &FieldArgs) -> Result<SignalParameters> {
    let form = fields.to_form();
    debug!("Form: {:?}", form);

    match validate(&form) {
        Ok(params) => Ok(params),
        Err(errors) => {
            for (field, error) in errors.iter() {
                eprintln!("  {}: {}", field, error);
            }
            bail!(
                "{} parameters rejected ({} invalid field(s))",
                fields.profile.label(),
                errors.len()
            )
        }
    }
}

fn cmd_validate(fields: FieldArgs) -> Result<()> {
    let params = check_fields(&fields)?;
    println!("Parameters accepted");
    for line in describe_params(&params) {
        println!("  {}", line);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            let config = GeneratorConfig::from_json(&text)
                .with_context(|| format!("Invalid config file {:?}", path))?;
            info!("Loaded generator config from {:?}", path);
            Ok(config)
        }
        None => Ok(GeneratorConfig::default()),
    }
}

/// Override the window of `profile` and re-check the grid size
fn apply_window(
    config: &mut GeneratorConfig,
    profile: Profile,
    window: PhysicalQuantity<TimeUnit>,
) -> Result<()> {
    let seconds = window.to_base_unit().context("Window needs a value")?;
    let section = config.for_profile_mut(profile);
    section.sampling = section.sampling.with_window(seconds);
    config
        .validate()
        .with_context(|| format!("Window {} rejected", window))
}

fn cmd_generate(
    fields: FieldArgs,
    no_received: bool,
    window: Option<PhysicalQuantity<TimeUnit>>,
    config: Option<PathBuf>,
    format: String,
    output: PathBuf,
) -> Result<()> {
    let params = check_fields(&fields)?;
    let mut config = load_config(config.as_deref())?;

    if let Some(window) = window {
        apply_window(&mut config, params.profile(), window)?;
    }

    for line in describe_params(&params) {
        info!("{}", line);
    }

    let options = GenerateOptions::default().include_received(!no_received);
    let set = rfprofile_core::generate(&params, &config, &options);

    for trace in set.traces() {
        info!(
            "{}: {} samples, peak {:.4}, rms {:.4}, span {:.3e} s",
            trace.name(),
            trace.len(),
            trace.peak_amplitude(),
            trace.rms(),
            trace.duration()
        );
    }

    let writer = open_output(&output)?;
    match format.as_str() {
        "json" => write_json(&set, writer)?,
        "csv" => write_csv(&set, writer)?,
        "f32" => write_f32(&set, writer)?,
        other => bail!("Unknown output format '{}', expected json, csv or f32", other),
    }

    if output.as_os_str() != "-" {
        info!("Wrote {} trace(s) to {:?}", set.traces().count(), output);
    }
    Ok(())
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufWriter::new(io::stdout().lock())))
    } else {
        let file = File::create(path).context("Failed to create output file")?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn write_json<W: Write>(set: &WaveformSet, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, set)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn write_csv<W: Write>(set: &WaveformSet, mut writer: W) -> Result<()> {
    let header: Vec<&str> = std::iter::once("time")
        .chain(set.traces().map(|t| t.name()))
        .collect();
    writeln!(writer, "{}", header.join(","))?;

    for (i, tx) in set.transmitted.samples.iter().enumerate() {
        write!(writer, "{:e},{:e}", tx.time, tx.amplitude)?;
        if let Some(rx) = set.received.as_ref().and_then(|t| t.samples.get(i)) {
            write!(writer, ",{:e}", rx.amplitude)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Each trace as interleaved little-endian `(time, amplitude)` f32 pairs,
/// transmitted first
fn write_f32<W: Write>(set: &WaveformSet, mut writer: W) -> Result<()> {
    use byteorder::{LittleEndian, WriteBytesExt};

    for trace in set.traces() {
        for sample in &trace.samples {
            writer.write_f32::<LittleEndian>(sample.time as f32)?;
            writer.write_f32::<LittleEndian>(sample.amplitude as f32)?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Profiles => cmd_profiles(),
        Commands::Convert { quantity, to } => cmd_convert(quantity, to),
        Commands::Validate { fields } => cmd_validate(fields),
        Commands::Generate {
            fields,
            no_received,
            window,
            config,
            format,
            output,
        } => cmd_generate(fields, no_received, window, config, format, output),
    }
}
