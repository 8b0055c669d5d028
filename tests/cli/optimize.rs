use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

fn chunk(id: u32, dictionary: &str) -> String {
    format!(
        "(self.webpackChunkapp=self.webpackChunkapp||[]).push([[{id}],{{{id}0:e=>{{e.exports={dictionary}}}}}]);"
    )
}

const APP: &str = r#"(self.webpackChunkapp=self.webpackChunkapp||[]).push([[9],{90:(e,t,n)=>{const r=function(){var e=this;return[e.$t("hello"),e.$t("missing")]}}}]);"#;

/// Reference `en`, a partial `es` and one usage chunk, as in the README example.
fn setup_dist(test: &CliTest) -> Result<()> {
    test.write_file("dist/js/en-po.js", &chunk(1, r#"{hello:"Hello",bye:"Bye"}"#))?;
    test.write_file("dist/js/es-po.js", &chunk(2, r#"{hello:"Hola"}"#))?;
    test.write_file("dist/js/app.js", APP)?;
    test.write_file("dist/index.html", "<script src=js/app.js></script>")?;
    Ok(())
}

#[test]
fn test_dry_run_reports_without_writing() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test.optimize_command().output()?;
    assert_eq!(output.status.code(), Some(0));

    let out = stdout(&output);
    assert!(out.contains("Indexed 2 keys from js/en-po.js"), "{}", out);
    assert!(out.contains("Would rewrite 3 file(s) in dist:"), "{}", out);
    assert!(out.contains("- js/app.js (usage, 1 edit)"), "{}", out);
    assert!(out.contains("- js/en-po.js (reference, 2 edits)"), "{}", out);
    assert!(out.contains("- js/es-po.js (language, 2 edits)"), "{}", out);
    assert!(out.contains("Run with --apply to write these changes."));

    let err = stderr(&output);
    assert!(err.contains(r#"warning: missing translations (1): "missing""#), "{}", err);
    assert!(err.contains(r#"= unused translations (1): "bye""#), "{}", err);
    assert!(err.contains("re-extract the reference translation file"));

    assert_eq!(test.read_file("dist/js/app.js")?, APP);
    assert_eq!(
        test.read_file("dist/js/en-po.js")?,
        chunk(1, r#"{hello:"Hello",bye:"Bye"}"#)
    );

    Ok(())
}

#[test]
fn test_apply_rewrites_dictionaries_and_usages() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Rewrote 3 file(s) in dist:"));

    assert_eq!(
        test.read_file("dist/js/en-po.js")?,
        chunk(1, r#"{0:"Hello",1:"Bye"}"#)
    );
    assert_eq!(
        test.read_file("dist/js/es-po.js")?,
        chunk(2, r#"{0:"Hola",1:'Bye'}"#)
    );
    assert_eq!(
        test.read_file("dist/js/app.js")?,
        APP.replace(r#"e.$t("hello")"#, "e.$t('0')")
    );
    assert_eq!(
        test.read_file("dist/index.html")?,
        "<script src=js/app.js></script>"
    );
    assert!(!test.root().join("dist/js/app.js.keyshrink-map.json").exists());

    Ok(())
}

#[test]
fn test_deny_warnings_fails_on_diagnostics() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test.optimize_command().arg("--deny-warnings").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2 translation keys out of sync (--deny-warnings is set)"));

    Ok(())
}

#[test]
fn test_deny_warnings_passes_when_in_sync() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/en-po.js", &chunk(1, r#"{hello:"Hello"}"#))?;
    test.write_file("dist/app.js", r#"x.$t("hello")"#)?;

    let output = test
        .optimize_command()
        .args(["--deny-warnings", "--apply"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(!stderr(&output).contains("warning:"));
    assert_eq!(test.read_file("dist/app.js")?, "x.$t('0')");

    Ok(())
}

#[test]
fn test_missing_reference_is_fatal_and_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/de-po.js", &chunk(1, r#"{hello:"Hallo"}"#))?;
    test.write_file("dist/fr-po.js", &chunk(2, r#"{hello:"Salut"}"#))?;
    test.write_file("dist/app.js", r#"x.$t("hello")"#)?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains(
            "Error: no reference language file for 'en' among language files: de-po.js, fr-po.js"
        ),
        "{}",
        stderr(&output)
    );
    assert_eq!(test.read_file("dist/app.js")?, r#"x.$t("hello")"#);

    Ok(())
}

#[test]
fn test_parse_error_is_fatal_and_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/en-po.js", &chunk(1, r#"{hello:"Hello"}"#))?;
    test.write_file("dist/de-po.js", "export default {hello: 'Hallo'}")?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("Error: failed to parse language file 'de-po.js'"),
        "{}",
        stderr(&output)
    );
    assert_eq!(
        test.read_file("dist/en-po.js")?,
        chunk(1, r#"{hello:"Hello"}"#)
    );

    Ok(())
}

#[test]
fn test_no_language_files_is_noop() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/app.js", r#"x.$t("hello")"#)?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Checked 1 file - no language files, nothing to optimize"));
    assert_eq!(test.read_file("dist/app.js")?, r#"x.$t("hello")"#);

    Ok(())
}

#[test]
fn test_missing_dist_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.optimize_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Build output directory not found: dist"));

    Ok(())
}

#[test]
fn test_emit_maps_writes_position_maps() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test
        .optimize_command()
        .args(["--apply", "--emit-maps"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Wrote 3 position map(s)"));

    let map: Value = serde_json::from_str(&test.read_file("dist/js/app.js.keyshrink-map.json")?)?;
    assert_eq!(map["file"], "js/app.js");
    assert_eq!(map["role"], "usage");

    let segments = map["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    let replaced = &segments[1];
    assert_eq!(replaced["replaced"], true);
    let key_start = APP.find(r#""hello""#).unwrap() as u64;
    assert_eq!(replaced["original"]["start"], key_start);
    assert_eq!(replaced["original"]["end"], key_start + 7);
    assert_eq!(replaced["generated"]["end"], key_start + 3);

    let mappings = map["mappings"].as_array().unwrap();
    assert_eq!(mappings[2]["generated"]["line"], 1);
    assert_eq!(mappings[2]["generated"]["column"], key_start + 3);
    assert_eq!(mappings[2]["original"]["column"], key_start + 7);

    assert!(test.root().join("dist/js/en-po.js.keyshrink-map.json").exists());
    assert!(test.root().join("dist/js/es-po.js.keyshrink-map.json").exists());
    assert!(!test.root().join("dist/index.html.keyshrink-map.json").exists());

    Ok(())
}

#[test]
fn test_emit_index_in_ordinal_order() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "dist/en-po.js",
        &chunk(1, r#"{zebra:"Z","Sign in":"Sign in",alpha:"A"}"#),
    )?;

    let output = test
        .optimize_command()
        .args(["--emit-index", "keys.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Wrote key index to keys.json"));

    assert_eq!(
        test.read_file("keys.json")?,
        "{\n  \"zebra\": 0,\n  \"Sign in\": 1,\n  \"alpha\": 2\n}\n"
    );
    // Dry run: the dictionary itself stays as it was.
    assert!(test.read_file("dist/en-po.js")?.contains("zebra:"));

    Ok(())
}

#[test]
fn test_config_file_settings() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".keyshrinkrc.json",
        r#"{
            "distRoot": "build",
            "referenceLanguage": "de",
            "translationFunctions": ["i18n.t"],
            "ignores": ["legacy/**"]
        }"#,
    )?;
    test.write_file("build/de-po.js", &chunk(1, r#"{hello:"Hallo"}"#))?;
    test.write_file("build/en-po.js", &chunk(2, r#"{}"#))?;
    test.write_file("build/main.js", r#"i18n.t("hello");$t("hello")"#)?;
    test.write_file("build/legacy/main.js", r#"i18n.t("hello")"#)?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    assert_eq!(
        test.read_file("build/en-po.js")?,
        chunk(2, r#"{0:'Hallo'}"#)
    );
    assert_eq!(
        test.read_file("build/main.js")?,
        r#"i18n.t('0');$t("hello")"#
    );
    assert_eq!(
        test.read_file("build/legacy/main.js")?,
        r#"i18n.t("hello")"#
    );

    Ok(())
}

#[test]
fn test_cli_flags_override_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keyshrinkrc.json", r#"{ "referenceLanguage": "de" }"#)?;
    test.write_file("out/en-po.js", &chunk(1, r#"{hello:"Hello"}"#))?;
    test.write_file("out/de-po.js", &chunk(2, r#"{bye:"Tschüss"}"#))?;

    let output = test
        .optimize_command()
        .args(["--dist-root", "out", "--reference-language", "en", "--apply"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Indexed 1 key from en-po.js"));
    assert_eq!(
        test.read_file("out/de-po.js")?,
        chunk(2, r#"{bye:"Tschüss",0:'Hello'}"#)
    );

    Ok(())
}

#[test]
fn test_invalid_reference_language_flag() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test
        .optimize_command()
        .args(["--reference-language", "en/US"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid 'referenceLanguage'"));

    Ok(())
}

#[test]
fn test_verbose_notes() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;

    let output = test.optimize_command().arg("-v").output()?;
    let err = stderr(&output);
    assert!(err.contains("Note: No .keyshrinkrc.json found, using default configuration"));
    assert!(err.contains("Note: js/en-po.js (minified): 2 entries"), "{}", err);
    assert!(err.contains("Note: 2 keys indexed from js/en-po.js"), "{}", err);
    assert!(err.contains("Note: js/app.js: 2 translation call(s), 1 unknown key(s)"), "{}", err);

    Ok(())
}

#[test]
fn test_binary_files_pass_through() -> Result<()> {
    let test = CliTest::new()?;
    setup_dist(&test)?;
    let bytes = [0x89u8, b'P', b'N', b'G', 0xff, 0xfe, 0x00];
    std::fs::write(test.root().join("dist/logo.png"), bytes)?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(std::fs::read(test.root().join("dist/logo.png"))?, bytes);

    Ok(())
}

#[test]
fn test_apply_updates_sibling_source_map() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/js/en-po.js", &chunk(1, r#"{hello:"Hello"}"#))?;
    // `y` is mapped at column 14, after the key that gets shortened.
    let app = "x=$t(\"hello\");y()\n//# sourceMappingURL=app.js.map";
    let map = r#"{"version":3,"file":"app.js","sources":["../src/app.ts"],"names":[],"mappings":"AAAA,cAAc"}"#;
    test.write_file("dist/js/app.js", app)?;
    test.write_file("dist/js/app.js.map", map)?;

    let output = test.optimize_command().output()?;
    assert!(
        stdout(&output).contains("- js/app.js.map (source-map, 1 mapping moved)"),
        "{}",
        stdout(&output)
    );
    assert_eq!(test.read_file("dist/js/app.js.map")?, map);

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(test.read_file("dist/js/app.js")?.starts_with("x=$t('0');y()"));

    let updated = sourcemap::SourceMap::from_slice(test.read_file("dist/js/app.js.map")?.as_bytes())?;
    let columns: Vec<(u32, u32)> = updated
        .tokens()
        .map(|t| (t.get_dst_col(), t.get_src_col()))
        .collect();
    assert_eq!(columns, vec![(0, 0), (10, 14)]);
    assert_eq!(updated.get_file(), Some("app.js"));

    Ok(())
}

#[test]
fn test_direct_chunk_with_stray_eval_call() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("dist/en-po.js", &chunk(1, r#"{"Click \"Save\"":"Click Save"}"#))?;
    test.write_file(
        "dist/app.js",
        "var r=eval(\"require\");n.$t(\"Click \\\"Save\\\"\");\n//# sourceURL=webpack://app/./src/main.js",
    )?;

    let output = test
        .optimize_command()
        .args(["--apply", "--deny-warnings"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(test.read_file("dist/app.js")?.contains("n.$t('0')"));

    Ok(())
}

#[test]
fn test_unminified_chunk_without_semicolon() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "dist/en-po.js",
        "/***/ (function(module, exports) {\n\nmodule.exports = {\"hello\":\"Hello\"}\n\n/***/ })",
    )?;
    test.write_file("dist/app.js", "_vm.$t(\"hello\")")?;

    let output = test.optimize_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(test.read_file("dist/en-po.js")?.contains("module.exports = {0:\"Hello\"}\n\n/***/ })"));
    assert_eq!(test.read_file("dist/app.js")?, "_vm.$t('0')");

    Ok(())
}
