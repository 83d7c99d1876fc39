// sitecheck-editor/examples/editor_flow.rs
// End-to-end editor flow against a running store

use sitecheck_client::{CloudinaryUploader, RawFile};
use sitecheck_editor::{ClientConfig, Editor};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <address> <photo-path> [photo-path...]", args[0]);
        println!("  Env: SITECHECK_BASE_URL, SITECHECK_TOKEN, SITECHECK_UPLOAD_URL, SITECHECK_UPLOAD_PRESET");
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    let store = config.build_store_client()?;
    let uploader = CloudinaryUploader::new(&config)?;

    let mut editor = Editor::new(store, uploader);
    editor.set_address(&args[1]);
    editor.set_notes("created by editor_flow example");

    let mut files = Vec::new();
    for path in &args[2..] {
        files.push(RawFile::open(path).await?);
    }
    editor.add_files(files)?;

    let outcome = editor.submit().await?;
    tracing::info!(inspection_id = outcome.inspection_id, "inspection saved");
    for failure in &outcome.failures {
        tracing::warn!(
            index = failure.index,
            label = %failure.label,
            "photo {} of {} failed: {}",
            failure.index + 1,
            editor.draft().slots().len(),
            failure.message
        );
    }

    Ok(())
}
