//! Integration tests for the CLI run context

use super::test_utils::animation_json;
use clap::Parser;
use ledframe::cli::{map_error, Cli, CommandOutput, Commands, RunContext, StoreOptions};
use ledframe::types::FRAME_BYTE_LENGTH;
use serde_json::json;
use tempfile::TempDir;

fn sled_context(workspace: &TempDir) -> RunContext {
    RunContext::new(
        workspace.path().to_path_buf(),
        None,
        StoreOptions::default(),
    )
    .unwrap()
    .with_color(false)
}

#[test]
fn test_replace_then_reopen_workspace() {
    let workspace = TempDir::new().unwrap();
    let upload = workspace.path().join("upload.json");
    std::fs::write(
        &upload,
        json!([animation_json("heart", 75, 0, &[[255, 0, 80], [120, 0, 40]])]).to_string(),
    )
    .unwrap();

    {
        let ctx = sled_context(&workspace);
        let cli = Cli::try_parse_from(["ledframe", "replace", upload.to_str().unwrap()]).unwrap();
        match ctx.execute(&cli.command).unwrap() {
            CommandOutput::Text(text) => assert!(text.contains("2 frame(s)")),
            CommandOutput::Bytes(_) => panic!("replace prints a summary"),
        }
    }

    assert!(workspace.path().join(".ledframe").join("store").exists());

    let ctx = sled_context(&workspace);
    let metadata = ctx.cache().get_metadata().unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].animation_id, "heart");

    let frame_id = metadata[0].frame_order[1].to_string();
    match ctx.execute(&Commands::Frame { frame_id }).unwrap() {
        CommandOutput::Bytes(bytes) => {
            assert_eq!(bytes.len(), FRAME_BYTE_LENGTH);
            assert_eq!(&bytes[..3], &[120, 0, 40]);
        }
        CommandOutput::Text(_) => panic!("frame prints raw bytes"),
    }
}

#[test]
fn test_rejected_upload_message() {
    let workspace = TempDir::new().unwrap();
    let upload = workspace.path().join("upload.json");
    std::fs::write(&upload, json!({ "not": "an array" }).to_string()).unwrap();

    let ctx = sled_context(&workspace);
    let err = ctx
        .execute(&Commands::Replace { file: upload })
        .unwrap_err();
    assert!(map_error(&err).starts_with("rejected: "));
}

#[test]
fn test_ephemeral_leaves_no_store() {
    let workspace = TempDir::new().unwrap();
    let ctx = RunContext::new(
        workspace.path().to_path_buf(),
        None,
        StoreOptions {
            path: None,
            ephemeral: true,
        },
    )
    .unwrap();
    assert!(!ctx.cache().get_metadata().unwrap().is_empty());
    assert!(!workspace.path().join(".ledframe").exists());
}
