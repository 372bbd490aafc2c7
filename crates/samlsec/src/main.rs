#![forbid(unsafe_code)]

//! samlsec CLI: validate SAML2 assertions and inspect canonical forms.

use clap::{Parser, Subcommand, ValueEnum};
use samlsec_assertion::{temporal, Verifier, VerifierConfig};
use samlsec_c14n::C14nMode;
use samlsec_core::Error;
use samlsec_xml::{IdIndex, XmlDocument};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "samlsec",
    about = "samlsec: SAML2 assertion validation (XML-DSig, C14N)",
    version
)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the assertion in a SAML response
    Verify {
        /// Input XML file
        file: PathBuf,

        /// Trusted IdP certificate (PEM, bare base64 or DER)
        #[arg(long)]
        cert: PathBuf,

        /// Verification time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<String>,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },

    /// Print the canonical form of a document or of one element
    C14n {
        /// Input XML file
        file: PathBuf,

        /// Canonicalization algorithm
        #[arg(long, value_enum, default_value_t = Mode::Exc)]
        mode: Mode,

        /// Canonicalize only the element carrying this ID
        #[arg(long)]
        id: Option<String>,

        /// InclusiveNamespaces PrefixList for exclusive modes
        #[arg(long = "prefix")]
        prefixes: Vec<String>,
    },

    /// List supported algorithms
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Exc,
    ExcComments,
    C14n,
    C14nComments,
    C14n11,
    C14n11Comments,
}

impl From<Mode> for C14nMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Exc => C14nMode::Exclusive,
            Mode::ExcComments => C14nMode::ExclusiveWithComments,
            Mode::C14n => C14nMode::Inclusive,
            Mode::C14nComments => C14nMode::InclusiveWithComments,
            Mode::C14n11 => C14nMode::Inclusive11,
            Mode::C14n11Comments => C14nMode::Inclusive11WithComments,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Verify {
            file,
            cert,
            now,
            id_attr,
        } => cmd_verify(file, cert, now, id_attr),
        Commands::C14n {
            file,
            mode,
            id,
            prefixes,
        } => cmd_c14n(file, mode.into(), id, prefixes),
        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_verify(
    file: PathBuf,
    cert: PathBuf,
    now: Option<String>,
    id_attr: Vec<String>,
) -> Result<(), Error> {
    let document = XmlDocument::parse(read_file(&file)?)?;
    let certificate = read_certificate(&cert)?;

    let mut config = VerifierConfig::new();
    for attr in &id_attr {
        config.add_id_attr(attr);
    }
    if let Some(raw) = now {
        let at = temporal::parse_datetime(&raw)
            .ok_or_else(|| Error::Other(format!("invalid --now value: {raw}")))?;
        config = config.with_now(at);
    }

    tracing::info!(file = %file.display(), "verifying");
    match Verifier::new(config).is_valid(&document, &certificate) {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("INVALID: {e}");
            process::exit(1);
        }
    }
}

fn cmd_c14n(
    file: PathBuf,
    mode: C14nMode,
    id: Option<String>,
    prefixes: Vec<String>,
) -> Result<(), Error> {
    let document = XmlDocument::parse(read_file(&file)?)?;
    let doc = document.parse_doc()?;

    let bytes = match id {
        Some(id) => {
            let index = IdIndex::build(&doc, &[]);
            let node = index.resolve(&doc, &id)?;
            samlsec_c14n::canonicalize_subtree(node, mode, &prefixes)?
        }
        None => samlsec_c14n::canonicalize_doc(&doc, mode, None, &prefixes)?,
    };

    use std::io::Write;
    std::io::stdout()
        .write_all(&bytes)
        .map_err(|e| Error::Other(format!("stdout: {e}")))
}

fn cmd_info() -> Result<(), Error> {
    println!("samlsec: SAML2 assertion validation");
    println!();
    println!("Supported digest algorithms:");
    println!("  SHA-224, SHA-256, SHA-384, SHA-512");
    println!("  SHA3-256, SHA3-384, SHA3-512");
    if cfg!(feature = "legacy-sha1") {
        println!("  SHA-1 (legacy-sha1)");
    }
    println!();
    println!("Supported signature algorithms:");
    println!("  RSA PKCS#1 v1.5 (SHA-224, SHA-256, SHA-384, SHA-512)");
    println!("  RSA-PSS (SHA-256, SHA-384, SHA-512)");
    println!("  ECDSA P-256/SHA-256, P-384/SHA-384");
    if cfg!(feature = "legacy-sha1") {
        println!("  RSA-SHA1, ECDSA-SHA1 (legacy-sha1)");
    }
    println!();
    println!("Supported canonicalization:");
    println!("  C14N 1.0 (±comments)");
    println!("  C14N 1.1 (±comments)");
    println!("  Exclusive C14N 1.0 (±comments)");
    println!();
    println!("Supported transforms:");
    println!("  enveloped-signature, any canonicalization above");
    println!();
    println!("Trust anchors:");
    println!("  X.509 certificate (PEM, bare base64, DER) with RSA, EC P-256 or EC P-384 key");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn read_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Other(format!("{}: {e}", path.display())))
}

fn read_file(path: &Path) -> Result<String, Error> {
    String::from_utf8(read_bytes(path)?)
        .map_err(|e| Error::XmlParse(format!("{}: invalid UTF-8: {e}", path.display())))
}

/// PEM or bare base64 text as is; a binary DER certificate as base64.
fn read_certificate(path: &Path) -> Result<String, Error> {
    match String::from_utf8(read_bytes(path)?) {
        Ok(text) => Ok(text),
        Err(e) => {
            use base64::Engine;
            Ok(base64::engine::general_purpose::STANDARD.encode(e.into_bytes()))
        }
    }
}
