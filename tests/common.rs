use assert_cmd::assert::Assert;
use assert_cmd::cargo_bin_cmd;

/// Run the program with default settings and the given arguments
pub fn run_commodity_balance(args: &[&str]) -> Assert {
    cargo_bin_cmd!("commodity-balance")
        .env("COMMODITY_BALANCE_USE_DEFAULT_SETTINGS", "1")
        .env_remove("COMMODITY_BALANCE_LOG_LEVEL")
        .args(args)
        .assert()
}

/// Check that the program runs successfully with the given arguments
pub fn assert_commodity_balance_runs(args: &[&str]) {
    run_commodity_balance(args).success();
}

/// Get the stderr of the program, which must fail, for the given arguments
pub fn get_commodity_balance_failure_stderr(args: &[&str]) -> String {
    let output = run_commodity_balance(args).failure().get_output().clone();
    String::from_utf8(output.stderr).unwrap()
}
