mod commands;

use tracing_subscriber::EnvFilter;
use yadisk_core::client::DiskClient;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Usage: yadisk <command> [arguments]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  df                              Show disk capacity and system folders");
    eprintln!("  ls <path>                       List a directory (all pages)");
    eprintln!("  stat <path>                     Show metainfo for a file or folder");
    eprintln!("  recent [limit]                  List recently uploaded files");
    eprintln!("  files [limit]                   List file resources across the disk");
    eprintln!("  cp <from> <to> [--overwrite]    Copy a resource");
    eprintln!("  mv <from> <to> [--overwrite]    Move a resource");
    eprintln!("  rm <path> [--permanently]       Delete a resource");
    eprintln!("  mkdir <path>                    Create a folder");
    eprintln!("  restore <trash-path> [name]     Restore a resource from the trash");
    eprintln!("  empty-trash                     Empty the trash");
    eprintln!("  publish <path>                  Publish a resource");
    eprintln!("  unpublish <path>                Unpublish a resource");
    eprintln!("  download <path> <file>          Download a resource to a local file");
    eprintln!("  upload <file> <path>            Upload a local file");
    eprintln!("  save-public <key> [name]        Save a public resource to the disk");
    eprintln!("  status <href>                   Poll an asynchronous operation");
    eprintln!("  version                         Show client and backend API versions");
    eprintln!();
    eprintln!("The OAuth token is read from the YADISK_OAUTH_TOKEN environment variable.");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args[0] == "--help" {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }
    if args[0] == "--version" {
        println!("yadisk {}", VERSION);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let token = std::env::var("YADISK_OAUTH_TOKEN")
        .map_err(|_| anyhow::anyhow!("YADISK_OAUTH_TOKEN is not set"))?;
    let client = DiskClient::new(&token)?;

    commands::run(&client, &args[0], &args[1..]).await
}
