use anyhow::Context;
use assert_cmd::Command;
use camino::Utf8PathBuf;
use cucumber::{World, given, then, when};
use estimator_bdd::{approx_eq, line_total};
use estimator_types::quote::Quote;
use fs_err as fs;
use tempfile::TempDir;

#[derive(Debug, Default, World)]
pub struct EstimatorWorld {
    temp: Option<TempDir>,
    root: Option<Utf8PathBuf>,
    quote: Option<Quote>,
    previous_total: Option<f64>,
    explain_output: Option<String>,
    last_exit_code: Option<i32>,
}

fn root(world: &EstimatorWorld) -> &Utf8PathBuf {
    world.root.as_ref().expect("root set")
}

fn quote(world: &EstimatorWorld) -> &Quote {
    world.quote.as_ref().expect("quote computed")
}

fn estimator(world: &EstimatorWorld) -> Command {
    let mut cmd = Command::cargo_bin("estimator").expect("estimator binary");
    cmd.current_dir(root(world).as_str());
    cmd
}

fn read_quote(world: &EstimatorWorld) -> Quote {
    let path = root(world)
        .join("artifacts")
        .join("estimator")
        .join("quote.json");
    let contents = fs::read_to_string(&path)
        .context("read quote.json")
        .unwrap();
    serde_json::from_str(&contents).unwrap()
}

fn edit_project(world: &EstimatorWorld, apply: impl FnOnce(&mut serde_json::Value)) {
    let path = root(world).join("project.json");
    let mut project: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    apply(&mut project);
    fs::write(&path, serde_json::to_string_pretty(&project).unwrap()).unwrap();
}

// ============================================================================
// Background
// ============================================================================

#[given("a fresh demo project")]
async fn fresh_demo_project(world: &mut EstimatorWorld) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
    world.temp = Some(td);
    world.root = Some(root);

    estimator(world).arg("init").assert().success();
}

#[given(expr = "an estimator.toml with:")]
async fn estimator_toml(world: &mut EstimatorWorld, step: &cucumber::gherkin::Step) {
    let body = step.docstring.as_deref().expect("docstring");
    fs::write(root(world).join("estimator.toml"), body).unwrap();
}

#[given(expr = "the project status is {string}")]
async fn project_status(world: &mut EstimatorWorld, status: String) {
    edit_project(world, |p| p["meta"]["status"] = serde_json::Value::String(status));
}

// ============================================================================
// Actions
// ============================================================================

#[when("I run estimator quote")]
async fn run_quote(world: &mut EstimatorWorld) {
    world.previous_total = world.quote.as_ref().map(|q| q.totals.grand_total_spec);
    estimator(world).arg("quote").assert().success();
    world.quote = Some(read_quote(world));
}

#[when(expr = "I run estimator quote with {string}")]
async fn run_quote_with(world: &mut EstimatorWorld, args: String) {
    world.previous_total = world.quote.as_ref().map(|q| q.totals.grand_total_spec);
    estimator(world)
        .arg("quote")
        .args(args.split_whitespace())
        .assert()
        .success();
    world.quote = Some(read_quote(world));
}

#[when(expr = "I run estimator quote with {string} expecting failure")]
async fn run_quote_expect_failure(world: &mut EstimatorWorld, args: String) {
    let output = estimator(world)
        .arg("quote")
        .args(args.split_whitespace())
        .output()
        .unwrap();
    world.last_exit_code = output.status.code();
}

#[when(expr = "I set {string} to resolution {int}")]
async fn set_resolution(world: &mut EstimatorWorld, item: String, level: u8) {
    estimator(world)
        .args(["edit", "--item", &item, "--resolution", &level.to_string()])
        .assert()
        .success();
}

#[when(expr = "I lock {string}")]
async fn lock_item(world: &mut EstimatorWorld, item: String) {
    estimator(world)
        .args(["edit", "--item", &item, "--lock", "truth"])
        .assert()
        .success();
}

#[when("I lock every item")]
async fn lock_every_item(world: &mut EstimatorWorld) {
    estimator(world)
        .args(["edit", "--all-locks", "truth"])
        .assert()
        .success();
}

#[when(expr = "I try to set {string} to resolution {int}")]
async fn try_set_resolution(world: &mut EstimatorWorld, item: String, level: u8) {
    let output = estimator(world)
        .args(["edit", "--item", &item, "--resolution", &level.to_string()])
        .output()
        .unwrap();
    world.last_exit_code = output.status.code();
}

#[when("I run estimator explain")]
async fn run_explain(world: &mut EstimatorWorld) {
    let output = estimator(world).arg("explain").output().unwrap();
    assert!(output.status.success());
    world.explain_output = Some(String::from_utf8_lossy(&output.stdout).to_string());
}

// ============================================================================
// Assertions
// ============================================================================

#[then(expr = "the quote has {int} lines")]
async fn quote_line_count(world: &mut EstimatorWorld, expected: usize) {
    assert_eq!(quote(world).lines.len(), expected);
}

#[then("the quote has no cohesion debt")]
async fn no_debt(world: &mut EstimatorWorld) {
    let q = quote(world);
    assert!(q.cohesion.mismatches.is_empty());
    assert!(approx_eq(q.cohesion.debt_total, 0.0));
    assert!(q.lines.iter().all(|l| l.item_type != "auto"));
}

#[then("the last line is the cohesion debt item")]
async fn last_line_is_debt(world: &mut EstimatorWorld) {
    let q = quote(world);
    let last = q.lines.last().expect("lines");
    assert_eq!(last.item_id, "auto-cohesion-debt");
    assert_eq!(last.item_type, "auto");
    assert!(approx_eq(last.total, q.cohesion.debt_total));
}

#[then(expr = "the core floor is {int}")]
async fn core_floor(world: &mut EstimatorWorld, expected: u8) {
    assert_eq!(quote(world).cohesion.core_floor.get(), expected);
}

#[then(expr = "{string} is lagging by {int} notch(es)")]
async fn lagging_by(world: &mut EstimatorWorld, item: String, notches: u8) {
    let mismatch = quote(world)
        .cohesion
        .mismatches
        .iter()
        .find(|m| m.item_id == item)
        .unwrap_or_else(|| panic!("no mismatch for {item}"));
    assert_eq!(mismatch.notches, notches);
}

#[then(expr = "the line total for {string} is {float}")]
async fn line_total_is(world: &mut EstimatorWorld, item: String, expected: f64) {
    let actual = line_total(quote(world), &item).expect("line");
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected} for {item}, got {actual}"
    );
}

#[then("the truth subtotal is positive")]
async fn truth_subtotal_positive(world: &mut EstimatorWorld) {
    assert!(quote(world).totals.truth_subtotal > 0.0);
}

#[then("the draft subtotal only holds the debt")]
async fn spec_subtotal_is_debt(world: &mut EstimatorWorld) {
    let q = quote(world);
    let debt = line_total(q, "auto-cohesion-debt").expect("debt line");
    assert!(approx_eq(q.totals.spec_subtotal, debt));
}

#[then("the grand totals differ by the debt")]
async fn grand_totals_differ(world: &mut EstimatorWorld) {
    let q = quote(world);
    let debt = line_total(q, "auto-cohesion-debt").expect("debt line");
    let t = &q.totals;
    assert!(
        approx_eq(t.grand_total_spec - t.grand_total_truth, debt),
        "spec {} truth {} debt {}",
        t.grand_total_spec,
        t.grand_total_truth,
        debt
    );
}

#[then("the total went up")]
async fn total_went_up(world: &mut EstimatorWorld) {
    let before = world.previous_total.expect("previous quote");
    assert!(quote(world).totals.grand_total_spec > before);
}

#[then("the total went down")]
async fn total_went_down(world: &mut EstimatorWorld) {
    let before = world.previous_total.expect("previous quote");
    assert!(quote(world).totals.grand_total_spec < before);
}

#[then(expr = "the line title for {string} is {string}")]
async fn line_title(world: &mut EstimatorWorld, item: String, expected: String) {
    let line = quote(world)
        .lines
        .iter()
        .find(|l| l.item_id == item)
        .expect("line");
    assert_eq!(line.title, expected);
}

#[then(expr = "the explanation mentions {string}")]
async fn explanation_mentions(world: &mut EstimatorWorld, needle: String) {
    let out = world.explain_output.as_deref().expect("explain output");
    assert!(out.contains(&needle), "expected {needle:?} in:\n{out}");
}

#[then(expr = "the exit code is {int}")]
async fn exit_code_is(world: &mut EstimatorWorld, expected: i32) {
    assert_eq!(world.last_exit_code, Some(expected));
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    EstimatorWorld::cucumber().run(features_path).await;
}
