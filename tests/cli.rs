use assert_cmd::Command;

// nothing listens on port 1, any accidental network call fails fast
const DEAD_RPC: &str = "http://127.0.0.1:1";

fn cosm_deploy(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cosm-deploy").unwrap();
    cmd.current_dir(dir.path())
        .env("RUST_LOG", "info")
        .env("COSM_DEPLOY_CHAIN_CFG__RPC_ENDPOINT", DEAD_RPC)
        .env_remove("MNEMONIC");
    cmd
}

fn stderr(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    cosm_deploy(&dir).arg("--help").assert().success();
}

#[test]
fn unknown_command_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    cosm_deploy(&dir).arg("frobnicate").assert().code(1);
}

#[test]
fn transfer_with_one_argument_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = cosm_deploy(&dir)
        .args(["transfer", "axm18xn4vtfkqwusvn02hglfuu3xcm549nd7js9ww5"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(!stderr(&out).contains("cannot reach"));
}

#[test]
fn transfer_without_configured_contract_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = cosm_deploy(&dir)
        .args(["transfer", "axm1recipient", "100"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cw20_contract"));
}

#[test]
fn signing_without_mnemonic_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let wasm = dir.path().join("contract.wasm");
    std::fs::write(&wasm, b"\0asm\x01\0\0\0").unwrap();

    let out = cosm_deploy(&dir)
        .arg("store")
        .arg(&wasm)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("MNEMONIC"), "stderr: {err}");
    assert!(!err.contains("cannot reach"));
}

#[test]
fn find_codes_needs_mnemonic() {
    let dir = tempfile::tempdir().unwrap();
    let out = cosm_deploy(&dir).args(["find-codes", "5"]).output().unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("MNEMONIC"));
}

#[test]
fn unreachable_node_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = cosm_deploy(&dir).arg("status").output().unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot reach"));
}

#[test]
fn invalid_query_json_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = cosm_deploy(&dir)
        .args(["query", "axm1contract", "{not json"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("not valid JSON"));
}
