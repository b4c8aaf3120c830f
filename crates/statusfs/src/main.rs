use std::io::{self, BufRead, Write};
use std::process;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use statusfs_core::engine::Verbosity;
use statusfs_core::prelude::*;
use statusfs_utils::{info, init_logging, init_logging_to_file, LogLevel, LogReloadHandle};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Inspect and tune a memory introspection engine through its .status pseudo-files.
#[derive(Parser, Debug)]
#[command(name = "statusfs")]
#[command(version)]
#[command(about = "Inspect and tune a memory introspection engine through its .status pseudo-files", long_about = None)]
struct Cli
{
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Initial engine settings
#[derive(Args, Debug)]
struct EngineArgs
{
    /// Local symbol cache directory
    #[arg(long, global = true)]
    symbol_cache: Option<String>,
    /// Symbol server URL
    #[arg(long, global = true)]
    symbol_server: Option<String>,
    /// Start with the memory cache disabled
    #[arg(long, global = true, default_value_t = false)]
    no_cache: bool,
    /// Start with paged memory reads disabled
    #[arg(long, global = true, default_value_t = false)]
    no_paging: bool,
    /// Refresh tick period in milliseconds
    #[arg(long, global = true)]
    tick_period_ms: Option<u32>,
    /// Highest native address of the target (hex format: 0x7fff0000 or decimal)
    #[arg(long, global = true, value_parser = parse_address)]
    native_max_address: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List every pseudo-file with its mode and size
    List,
    /// Read a pseudo-file
    Read
    {
        /// Pseudo-file name (case-insensitive)
        name: String,
        /// Byte offset to start reading at
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
        /// Number of bytes to read (default: to end of file)
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Write a value to a pseudo-file
    Write
    {
        /// Pseudo-file name (case-insensitive)
        name: String,
        /// Value, written verbatim as bytes
        value: String,
        /// Byte offset to start writing at
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
    },
    /// Interactive session on one engine instance
    Shell,
}

impl EngineArgs
{
    fn to_config(&self) -> EngineConfig
    {
        let mut config = EngineConfig::default();
        if let Some(cache) = &self.symbol_cache {
            config.symbol_cache.clone_from(cache);
        }
        if let Some(server) = &self.symbol_server {
            config.symbol_server.clone_from(server);
        }
        config.cache_enabled = !self.no_cache;
        config.paging_enabled = !self.no_paging;
        if let Some(period) = self.tick_period_ms {
            config.tick_period_ms = period;
        }
        if let Some(address) = self.native_max_address {
            config.native_max_address = address;
        }
        config
    }
}

fn parse_address(text: &str) -> Result<u64, String>
{
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{text}': {e}"))
}

/// Log level matching the engine's verbosity flags.
fn verbosity_level(verbosity: &Verbosity) -> LogLevel
{
    if !verbosity.enabled.load(Ordering::SeqCst) {
        LogLevel::Warn
    } else if verbosity.vv.load(Ordering::SeqCst) || verbosity.vvv.load(Ordering::SeqCst) {
        LogLevel::Trace
    } else if verbosity.v.load(Ordering::SeqCst) {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Post-write notifications for the command line: verbosity drives the log filter,
/// the rest are logged.
struct CliHooks
{
    state: Arc<EngineState>,
    logging: LogReloadHandle,
}

impl StatusHooks for CliHooks
{
    fn verbosity_changed(&self) -> StatusResult<()>
    {
        let level = verbosity_level(&self.state.verbosity);
        self.logging
            .set_level(level)
            .map_err(|e| StatusError::HookFailed(e.to_string()))?;
        info!(?level, "log level follows engine verbosity");
        Ok(())
    }

    fn refresh_registry(&self) -> StatusResult<()>
    {
        let ticks = self.state.refresh.tick_registry.load(Ordering::SeqCst);
        info!(ticks, "registry refresh requested");
        Ok(())
    }

    fn symbols_changed(&self) -> StatusResult<()>
    {
        let symbols = &self.state.symbols;
        info!(
            enabled = symbols.enabled.load(Ordering::SeqCst),
            server_enabled = symbols.server_enabled.load(Ordering::SeqCst),
            cache = %symbols.local_cache.to_string_lossy(),
            server = %symbols.server.to_string_lossy(),
            "symbol configuration changed"
        );
        Ok(())
    }
}

fn main()
{
    let cli = Cli::parse();

    // The shell owns stdout, so it logs to a file instead
    let logging = if matches!(cli.command, Commands::Shell) {
        init_logging_to_file(None).map(|(path, handle)| {
            eprintln!("Logging to {}", path.display());
            handle
        })
    } else {
        init_logging()
    };
    let logging = match logging {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli, logging) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(cli: Cli, logging: LogReloadHandle) -> CliResult<()>
{
    let state = Arc::new(EngineState::new(&cli.engine.to_config()));
    let hooks = CliHooks {
        state: Arc::clone(&state),
        logging,
    };
    let module = create_status_module(state, Arc::new(hooks));

    match cli.command {
        Commands::List => {
            print_listing(&*module)?;
            Ok(())
        }
        Commands::Read { name, offset, length } => {
            let bytes = read_file(&*module, &name, offset, length)?;
            print!("{}", render_bytes(&bytes));
            io::stdout().flush()?;
            Ok(())
        }
        Commands::Write { name, value, offset } => {
            let accepted = module.write(&name, value.as_bytes(), offset)?;
            println!("Wrote {accepted} byte(s) to {name}");
            Ok(())
        }
        Commands::Shell => run_shell(&*module),
    }
}

fn print_listing(module: &dyn VfsModule) -> StatusResult<()>
{
    println!("{}/", module.name());
    for file in module.list("")? {
        println!("  {file}");
    }
    Ok(())
}

/// Read `length` bytes (or up to end of file) starting at `offset`.
fn read_file(module: &dyn VfsModule, name: &str, offset: u64, length: Option<usize>) -> StatusResult<Vec<u8>>
{
    let mut out = Vec::new();
    let mut chunk = [0u8; 512];
    let mut position = offset;
    loop {
        let want = length.map_or(chunk.len(), |length| (length - out.len()).min(chunk.len()));
        if want == 0 {
            break;
        }
        let read = module.read(name, &mut chunk[..want], position)?;
        if read == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..read]);
        position += read as u64;
    }
    Ok(out)
}

/// Printable text as is; anything else byte-escaped.
fn render_bytes(bytes: &[u8]) -> String
{
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.chars().any(|c| c.is_control() && c != '\n' && c != '\t') => text.to_string(),
        _ => bytes
            .iter()
            .flat_map(|byte| std::ascii::escape_default(*byte))
            .map(char::from)
            .collect(),
    }
}

const SHELL_HELP: &str = "\
Commands:
  ls                    list pseudo-files
  cat <name>            print a pseudo-file
  write <name> <value>  write a value to a pseudo-file
  help                  show this help
  exit                  leave the shell";

fn run_shell(module: &dyn VfsModule) -> CliResult<()>
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("statusfs shell, 'help' for commands");

    loop {
        print!("{}> ", module.name());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            return Ok(());
        }

        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let name = parts.next();
        let value = parts.next().map(str::trim_start);

        let result = match (command, name, value) {
            ("", ..) => Ok(()),
            ("exit" | "quit", ..) => return Ok(()),
            ("help", ..) => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            ("ls", ..) => print_listing(module),
            ("cat", Some(name), _) => read_file(module, name, 0, None).map(|bytes| {
                let text = render_bytes(&bytes);
                if text.ends_with('\n') {
                    print!("{text}");
                } else {
                    println!("{text}");
                }
            }),
            ("write", Some(name), Some(value)) => module
                .write(name, value.as_bytes(), 0)
                .map(|accepted| println!("{accepted} byte(s) accepted")),
            ("cat" | "write", ..) => {
                println!("missing arguments, see 'help'");
                Ok(())
            }
            (other, ..) => {
                println!("unknown command '{other}', see 'help'");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {e}");
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_verbosity_level_mapping()
    {
        let state = EngineState::default();
        assert_eq!(verbosity_level(&state.verbosity), LogLevel::Info);

        state.store_bool(BoolSetting::PrintfV, true);
        assert_eq!(verbosity_level(&state.verbosity), LogLevel::Debug);

        state.store_bool(BoolSetting::PrintfVvv, true);
        assert_eq!(verbosity_level(&state.verbosity), LogLevel::Trace);

        state.store_bool(BoolSetting::PrintfEnable, false);
        assert_eq!(verbosity_level(&state.verbosity), LogLevel::Warn);
    }

    #[test]
    fn test_parse_address()
    {
        assert_eq!(parse_address("0x7fff0000").unwrap(), 0x7fff_0000);
        assert_eq!(parse_address("4096").unwrap(), 4096);
        assert!(parse_address("0xzz").is_err());
    }

    #[test]
    fn test_render_bytes_escapes_binary()
    {
        assert_eq!(render_bytes(b"00000064"), "00000064");
        assert_eq!(render_bytes(b"line\n"), "line\n");
        assert_eq!(render_bytes(&[0x31, 0x00]), "1\\x00");
    }

    #[test]
    fn test_engine_args_override_defaults()
    {
        let cli = Cli::parse_from(["statusfs", "--no-paging", "--tick-period-ms", "250", "list"]);
        let config = cli.engine.to_config();
        assert!(!config.paging_enabled);
        assert!(config.cache_enabled);
        assert_eq!(config.tick_period_ms, 250);
        assert_eq!(config.symbol_server, EngineConfig::default().symbol_server);
    }

    #[test]
    fn test_read_file_to_end()
    {
        let module = create_status_module(Arc::new(EngineState::default()), Arc::new(NoopHooks));
        let bytes = read_file(&*module, "config_refresh_tick_period_ms", 0, None).unwrap();
        assert_eq!(bytes, b"00000064");
        let bytes = read_file(&*module, "config_refresh_tick_period_ms", 4, Some(2)).unwrap();
        assert_eq!(bytes, b"00");
    }
}
