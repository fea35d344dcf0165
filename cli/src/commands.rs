//! Command implementations for the yadisk CLI.
//!
//! Each command maps to one library operation, awaits its promise, and
//! renders the outcome. Failures are logged and exit nonzero; nothing else
//! changes on failure.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use tracing::{info, warn};
use yadisk_core::client::{
    CopyOutcome, DeleteOutcome, DirectoryOutcome, DiskClient, DownloadOutcome, FileListOutcome,
    FillOutcome, LastUploadedOutcome, ListOptions, ListingOutcome, MakeFolderOutcome,
    MetainfoOutcome, MoveOutcome, OperationOutcome, PageSink, PublishOutcome, RestoreOutcome,
    SavePublicOutcome, UploadOutcome, IMPLEMENTED_API_BUILD, IMPLEMENTED_API_VERSION,
};
use yadisk_core::path::DiskPath;

pub async fn run(client: &DiskClient, command: &str, args: &[String]) -> Result<()> {
    match command {
        "df" => df(client).await,
        "ls" => ls(client, required(args, 0, "path")?).await,
        "stat" => stat(client, required(args, 0, "path")?).await,
        "recent" => recent(client, parse_limit(args.first())?).await,
        "files" => files(client, parse_limit(args.first())?).await,
        "cp" => {
            copy(
                client,
                required(args, 0, "from")?,
                required(args, 1, "to")?,
                has_flag(args, "--overwrite"),
            )
            .await
        }
        "mv" => {
            rename(
                client,
                required(args, 0, "from")?,
                required(args, 1, "to")?,
                has_flag(args, "--overwrite"),
            )
            .await
        }
        "rm" => remove(client, required(args, 0, "path")?, has_flag(args, "--permanently")).await,
        "mkdir" => mkdir(client, required(args, 0, "path")?).await,
        "restore" => {
            restore(
                client,
                required(args, 0, "trash-path")?,
                args.get(1).filter(|arg| !arg.starts_with("--")).map(String::as_str),
            )
            .await
        }
        "empty-trash" => empty_trash(client).await,
        "publish" => publish(client, required(args, 0, "path")?, true).await,
        "unpublish" => publish(client, required(args, 0, "path")?, false).await,
        "download" => {
            download(client, required(args, 0, "path")?, required(args, 1, "file")?).await
        }
        "upload" => upload(client, required(args, 0, "file")?, required(args, 1, "path")?).await,
        "save-public" => {
            save_public(
                client,
                required(args, 0, "key")?,
                args.get(1).map(String::as_str),
            )
            .await
        }
        "status" => status(client, required(args, 0, "href")?).await,
        "version" => version(client).await,
        other => bail!("unknown command: {other} (try --help)"),
    }
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing <{name}> argument"))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn parse_limit(arg: Option<&String>) -> Result<Option<usize>> {
    match arg {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("invalid limit: {raw}")),
    }
}

async fn df(client: &DiskClient) -> Result<()> {
    match client.metainfo(None).value().await {
        MetainfoOutcome::Done {
            total_space,
            used_space,
            trash_size,
            system_folders,
        } => {
            println!("total: {total_space} bytes");
            println!("used:  {used_space} bytes");
            println!("trash: {trash_size} bytes");
            let mut folders: Vec<_> = system_folders.into_iter().collect();
            folders.sort();
            for (name, path) in folders {
                println!("  {name}: {path}");
            }
            Ok(())
        }
        MetainfoOutcome::Failed(err) => {
            warn!(error = %err, "metainfo failed");
            bail!("{err}")
        }
    }
}

async fn ls(client: &DiskClient, path: &str) -> Result<()> {
    let path = DiskPath::parse(path);
    let sink: PageSink = Arc::new(|page| {
        info!(
            offset = page.offset,
            count = page.count,
            missing = page.missing,
            "page arrived"
        );
    });
    let fetch = client.fetch_directory(&path, &ListOptions::default(), Some(sink));

    match fetch.result.value().await {
        DirectoryOutcome::File(resource) => {
            println!("{resource}");
            return Ok(());
        }
        DirectoryOutcome::Directory(_) => {}
        DirectoryOutcome::Failed(err) => {
            warn!(error = %err, "listing failed");
            bail!("{err}")
        }
    }

    // Render once the full set is merged; partial data is still shown when a
    // follow-up page failed.
    let fill = fetch.completion.value().await;
    if let FillOutcome::Failed(err) = &fill {
        warn!(error = %err, "directory only partially loaded");
    }
    if let DirectoryOutcome::Directory(slots) = fetch.result.value().await {
        for (index, slot) in slots.snapshot().into_iter().enumerate() {
            match slot {
                Some(entry) => println!("{entry}"),
                None => println!("? entry {index} not loaded"),
            }
        }
    }
    Ok(())
}

async fn stat(client: &DiskClient, path: &str) -> Result<()> {
    let path = DiskPath::parse(path);
    let opts = ListOptions {
        limit: Some(0),
        ..ListOptions::default()
    };
    match client.list_path(&path, &opts, None).value().await {
        ListingOutcome::File(resource) => print_details(&resource),
        ListingOutcome::Listing(page) => {
            print_details(&page.dir);
            println!("entries: {}", page.total);
        }
        ListingOutcome::Failed(err) => {
            warn!(error = %err, "stat failed");
            bail!("{err}")
        }
    }
    Ok(())
}

fn print_details(resource: &yadisk_core::model::Resource) {
    println!("name:     {}", resource.name);
    println!("path:     {}", resource.path);
    println!("created:  {}", resource.created.to_rfc3339());
    println!("modified: {}", resource.modified.to_rfc3339());
    if let Some(size) = resource.size {
        println!("size:     {size} bytes");
    }
    if let Some(mime) = &resource.mime_type {
        println!("mime:     {mime}");
    }
    if let Some(url) = &resource.public_url {
        println!("public:   {url}");
    }
    if let Some(origin) = &resource.origin_path {
        println!("origin:   {origin}");
    }
}

async fn recent(client: &DiskClient, limit: Option<usize>) -> Result<()> {
    match client.last_uploaded(limit, None, None, None, None).value().await {
        LastUploadedOutcome::Listing { items, .. } => {
            for item in items {
                println!("{item}");
            }
            Ok(())
        }
        LastUploadedOutcome::Failed(err) => {
            warn!(error = %err, "recent failed");
            bail!("{err}")
        }
    }
}

async fn files(client: &DiskClient, limit: Option<usize>) -> Result<()> {
    let opts = ListOptions {
        limit,
        ..ListOptions::default()
    };
    match client.list_files(None, &opts, None).value().await {
        FileListOutcome::Listing { items, .. } => {
            for item in items {
                println!("{item}");
            }
            Ok(())
        }
        FileListOutcome::Failed(err) => {
            warn!(error = %err, "files failed");
            bail!("{err}")
        }
    }
}

async fn copy(client: &DiskClient, from: &str, to: &str, overwrite: bool) -> Result<()> {
    let outcome = client
        .copy_path(
            &DiskPath::parse(to),
            &DiskPath::parse(from),
            overwrite.then_some(true),
            None,
        )
        .value()
        .await;
    match outcome {
        CopyOutcome::Done(_) => {
            println!("copied");
            Ok(())
        }
        CopyOutcome::InProcess(link) => {
            println!("copying in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        CopyOutcome::Failed(err) => {
            warn!(error = %err, "copy failed");
            bail!("{err}")
        }
    }
}

async fn rename(client: &DiskClient, from: &str, to: &str, overwrite: bool) -> Result<()> {
    let outcome = client
        .move_path(
            &DiskPath::parse(to),
            &DiskPath::parse(from),
            overwrite.then_some(true),
            None,
        )
        .value()
        .await;
    match outcome {
        MoveOutcome::Done(_) => {
            println!("moved");
            Ok(())
        }
        MoveOutcome::InProcess(link) => {
            println!("moving in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        MoveOutcome::Failed(err) => {
            warn!(error = %err, "move failed");
            bail!("{err}")
        }
    }
}

async fn remove(client: &DiskClient, path: &str, permanently: bool) -> Result<()> {
    let path = DiskPath::parse(path);
    // Trash resources are always removed for good; the flag only applies to
    // app and disk paths.
    let permanently = match path {
        DiskPath::Trash(_) => None,
        _ => permanently.then_some(true),
    };
    match client.delete_path(&path, permanently, None).value().await {
        DeleteOutcome::Done => {
            println!("deleted");
            Ok(())
        }
        DeleteOutcome::InProcess(link) => {
            println!("deletion in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        DeleteOutcome::Failed(err) => {
            warn!(error = %err, "delete failed");
            bail!("{err}")
        }
    }
}

async fn mkdir(client: &DiskClient, path: &str) -> Result<()> {
    match client
        .make_folder(&DiskPath::parse(path), None)
        .value()
        .await
    {
        MakeFolderOutcome::Created(_) => {
            println!("created");
            Ok(())
        }
        MakeFolderOutcome::Failed(err) => {
            warn!(error = %err, "mkdir failed");
            bail!("{err}")
        }
    }
}

async fn restore(client: &DiskClient, path: &str, name: Option<&str>) -> Result<()> {
    let outcome = client
        .restore_path(&DiskPath::trash(path), name, None, None)
        .value()
        .await;
    match outcome {
        RestoreOutcome::Done(_) => {
            println!("restored");
            Ok(())
        }
        RestoreOutcome::InProcess(link) => {
            println!("restore in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        RestoreOutcome::Failed(err) => {
            warn!(error = %err, "restore failed");
            bail!("{err}")
        }
    }
}

async fn empty_trash(client: &DiskClient) -> Result<()> {
    match client.empty_trash(None).value().await {
        DeleteOutcome::Done => {
            println!("trash emptied");
            Ok(())
        }
        DeleteOutcome::InProcess(link) => {
            println!("emptying in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        DeleteOutcome::Failed(err) => {
            warn!(error = %err, "empty-trash failed");
            bail!("{err}")
        }
    }
}

async fn publish(client: &DiskClient, path: &str, publish: bool) -> Result<()> {
    let path = DiskPath::parse(path);
    let outcome = if publish {
        client.publish_path(&path, None).value().await
    } else {
        client.unpublish_path(&path, None).value().await
    };
    match outcome {
        PublishOutcome::Done(link) => {
            println!("done: {}", link.href);
            Ok(())
        }
        PublishOutcome::Failed(err) => {
            warn!(error = %err, "publish failed");
            bail!("{err}")
        }
    }
}

async fn download(client: &DiskClient, path: &str, file: &str) -> Result<()> {
    let outcome = client
        .download_path(&DiskPath::parse(path), Path::new(file), None)
        .value()
        .await;
    match outcome {
        DownloadOutcome::Done => {
            println!("downloaded to {file}");
            Ok(())
        }
        DownloadOutcome::Failed(err) => {
            warn!(error = %err, "download failed");
            bail!("{err}")
        }
    }
}

async fn upload(client: &DiskClient, file: &str, path: &str) -> Result<()> {
    let outcome = client
        .upload_file(Path::new(file), &DiskPath::parse(path), None, None)
        .value()
        .await;
    match outcome {
        UploadOutcome::Done => {
            println!("uploaded {file}");
            Ok(())
        }
        UploadOutcome::InProcess(link) => {
            println!("upload in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        UploadOutcome::Failed(err) => {
            warn!(error = %err, "upload failed");
            bail!("{err}")
        }
    }
}

async fn save_public(client: &DiskClient, key: &str, name: Option<&str>) -> Result<()> {
    let outcome = client
        .save_public_to_disk(key, name, None, None)
        .value()
        .await;
    match outcome {
        SavePublicOutcome::Done(link) => {
            println!("saved: {}", link.href);
            Ok(())
        }
        SavePublicOutcome::InProcess(link) => {
            println!("saving in progress; poll with: yadisk status {}", link.href);
            Ok(())
        }
        SavePublicOutcome::Failed(err) => {
            warn!(error = %err, "save-public failed");
            bail!("{err}")
        }
    }
}

async fn status(client: &DiskClient, href: &str) -> Result<()> {
    match client.operation_status(href, None).value().await {
        OperationOutcome::Status(status) => {
            println!("{status}");
            Ok(())
        }
        OperationOutcome::Failed(err) => {
            warn!(error = %err, "status failed");
            bail!("{err}")
        }
    }
}

async fn version(client: &DiskClient) -> Result<()> {
    println!("implemented: {IMPLEMENTED_API_VERSION} (build {IMPLEMENTED_API_BUILD})");
    match client.api_version(None).value().await {
        yadisk_core::client::ApiVersionOutcome::Done { build, version } => {
            println!("backend:     {version} (build {build})");
            Ok(())
        }
        yadisk_core::client::ApiVersionOutcome::Failed(err) => {
            warn!(error = %err, "version failed");
            bail!("{err}")
        }
    }
}
