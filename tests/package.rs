use chrono::DateTime;
use mtzgen::config::Configuration;
use mtzgen::error::{Error, Result};
use mtzgen::icons::IconProcessor;
use mtzgen::ids::{FixedPrefix, RandomPrefix};
use mtzgen::package::{PackageOptions, build_package};
use pretty_assertions::assert_eq;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

const CONFIG: &str = r#"
prefix: ACME
author: ACME Labs
script: /opt/acme/trx.py
transforms:
  resolve:
    input: [Domain, IPv4Address]
    call: do_resolve
    display: Resolve
    desc: DNS resolution
    set: Network
  whois:
    input: [maltego.Domain]
    call: do_whois
transformsets:
  Network: Network lookups
  Empty: Declared but unused
entities:
  Host:
    icon: Acme/host
    category: Infrastructure
    display: Host
    editValue: fqdn
    properties:
      fqdn: { display: FQDN, default: localhost }
      port: { type: int, sample: "443" }
  Router:
    icon: Acme/router
    category: Infrastructure
    parent: ACME.Host
machines:
  sweep:
    desc: Resolve everything
    favorite: true
    instructions: |-
      start {
          run("ACME.Domain2resolve")
      }
"#;

fn config() -> Configuration {
    serde_yaml::from_str(CONFIG).unwrap()
}

fn options(dir: &TempDir) -> PackageOptions {
    PackageOptions {
        staging_dir: dir.path().join("mtz"),
        output: dir.path().join("config.mtz"),
        last_sync: Some(DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap()),
        protect: Vec::new(),
    }
}

fn entries(archive: &Path) -> Vec<(String, String)> {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut out = Vec::new();
    for i in 0..zip.len() {
        let mut f = zip.by_index(i).unwrap();
        let mut body = String::new();
        f.read_to_string(&mut body).unwrap();
        out.push((f.name().to_string(), body));
    }
    out.sort();
    out
}

fn entry<'a>(entries: &'a [(String, String)], name: &str) -> &'a str {
    entries
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, body)| body.as_str())
        .unwrap_or_else(|| panic!("archive has no entry {name}"))
}

fn assert_well_formed(name: &str, xml: &str) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("{name} is not well-formed: {e}"),
        }
    }
}

#[test]
fn builds_complete_package() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);

    let report = build_package(&config(), &RandomPrefix::default(), None, &opts).unwrap();
    assert_eq!(report.prefix, "ACME");
    assert_eq!(
        report.transforms,
        vec![
            "ACME.Domain2resolve".to_string(),
            "ACME.IPv4Address2resolve".to_string(),
            "ACME.Domain2whois".to_string(),
        ]
    );
    assert_eq!(report.empty_sets, vec!["Empty".to_string()]);
    assert!(!opts.staging_dir.exists(), "staging tree should be removed");

    let files = entries(&opts.output);
    let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Entities/ACME.Host.entity",
            "Entities/ACME.Router.entity",
            "EntityCategories/infrastructure.category",
            "Machines/ACME_sweep.machine",
            "Machines/ACME_sweep.properties",
            "Servers/Local.tas",
            "TransformRepositories/Local/ACME.Domain2resolve.transform",
            "TransformRepositories/Local/ACME.Domain2resolve.transformsettings",
            "TransformRepositories/Local/ACME.Domain2whois.transform",
            "TransformRepositories/Local/ACME.Domain2whois.transformsettings",
            "TransformRepositories/Local/ACME.IPv4Address2resolve.transform",
            "TransformRepositories/Local/ACME.IPv4Address2resolve.transformsettings",
            "TransformSets/network.set",
        ]
    );
    assert_eq!(report.files, names.len());

    for (name, body) in &files {
        if !name.starts_with("Machines/") {
            assert_well_formed(name, body);
        }
    }

    let tas = entry(&files, "Servers/Local.tas");
    assert!(tas.contains("<LastSync>2024-05-01 12:00:00.000 +02:00</LastSync>"));
    for id in &report.transforms {
        assert!(tas.contains(&format!(r#"<Transform name="{id}"/>"#)), "{id}");
    }

    assert_eq!(
        entry(&files, "TransformSets/network.set"),
        concat!(
            r#"<TransformSet name="Network" description="Network lookups"><Transforms>"#,
            r#"<Transform name="ACME.Domain2resolve"/><Transform name="ACME.IPv4Address2resolve"/>"#,
            "</Transforms></TransformSet>"
        )
    );

    let host = entry(&files, "Entities/ACME.Host.entity");
    assert!(host.contains(r#"name="properties.fqdn" type="string" description="" displayName="FQDN" evaluator="maltego.replace">"#));
    assert!(host.contains(r#"<Properties value="properties.fqdn">"#));
    assert!(entry(&files, "Entities/ACME.Router.entity").contains("<BaseEntity>ACME.Host</BaseEntity>"));

    let settings = entry(
        &files,
        "TransformRepositories/Local/ACME.IPv4Address2resolve.transformsettings",
    );
    assert!(settings.contains(">/opt/acme/trx.py -t resolve -i IPv4Address</Property>"));

    assert_eq!(
        entry(&files, "Machines/ACME_sweep.properties"),
        "favorite = true\nenabled = true"
    );
    assert!(entry(&files, "Machines/ACME_sweep.machine").contains("\n    run(\"ACME.Domain2resolve\")\n"));
}

#[test]
fn fixed_prefix_builds_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    let mut cfg = config();
    cfg.prefix = None;
    let prefix = FixedPrefix("FIXED".into());

    build_package(&cfg, &prefix, None, &opts).unwrap();
    let first = entries(&opts.output);

    build_package(&cfg, &prefix, None, &opts).unwrap();
    let second = entries(&opts.output);

    assert_eq!(first, second);
    assert!(first.iter().any(|(n, _)| n == "Entities/FIXED.Host.entity"));
}

#[test]
fn random_prefix_is_shared_by_every_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config();
    cfg.prefix = None;

    let report = build_package(&cfg, &RandomPrefix::default(), None, &options(&dir)).unwrap();
    assert_eq!(report.prefix.len(), 6);
    let ns = format!("{}.", report.prefix);
    assert!(report.transforms.iter().all(|id| id.starts_with(&ns)));
    assert!(report.entities.iter().all(|id| id.starts_with(&ns)));
    assert!(report.machines.iter().all(|id| id.starts_with(&ns)));
}

#[test]
fn rebuild_replaces_archive_contents() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);

    build_package(&config(), &RandomPrefix::default(), None, &opts).unwrap();

    let mut smaller = config();
    smaller.transforms.remove("whois");
    smaller.entities.clear();
    build_package(&smaller, &RandomPrefix::default(), None, &opts).unwrap();

    let names: Vec<String> = entries(&opts.output).into_iter().map(|(n, _)| n).collect();
    assert!(!names.iter().any(|n| n.contains("whois")));
    assert!(!names.iter().any(|n| n.starts_with("Entities/")));
}

#[test]
fn category_shared_by_entities_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);

    let report = build_package(&config(), &RandomPrefix::default(), None, &opts).unwrap();
    assert_eq!(report.categories, vec!["Infrastructure".to_string()]);
    let count = entries(&opts.output)
        .iter()
        .filter(|(n, _)| n.starts_with("EntityCategories/"))
        .count();
    assert_eq!(count, 1);
}

/// Copies the source file instead of resizing it.
struct CopyProcessor;

impl IconProcessor for CopyProcessor {
    fn resize(&self, src: &Path, dst: &Path, _size: u32) -> Result<()> {
        fs::copy(src, dst)
            .map(|_| ())
            .map_err(|e| Error::Icon {
                path: src.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

fn config_with_icon(dir: &TempDir) -> Configuration {
    let src = dir.path().join("host.png");
    fs::write(&src, "png-bytes").unwrap();
    let mut cfg = config();
    cfg.icons.insert(
        "Acme".into(),
        [("host".to_string(), src)].into_iter().collect(),
    );
    cfg
}

#[test]
fn icons_are_staged_in_four_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    let cfg = config_with_icon(&dir);

    let report = build_package(&cfg, &RandomPrefix::default(), Some(&CopyProcessor), &opts).unwrap();
    assert_eq!(report.icons, 4);

    let files = entries(&opts.output);
    for name in [
        "Icons/Acme/host.png",
        "Icons/Acme/host24.png",
        "Icons/Acme/host32.png",
        "Icons/Acme/host48.png",
    ] {
        assert_eq!(entry(&files, name), "png-bytes");
    }
}

#[test]
fn icons_are_skipped_without_a_processor() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    let cfg = config_with_icon(&dir);

    let report = build_package(&cfg, &RandomPrefix::default(), None, &opts).unwrap();
    assert_eq!(report.icons, 0);
    assert!(!entries(&opts.output).iter().any(|(n, _)| n.starts_with("Icons/")));
}

#[test]
fn icon_failure_aborts_and_keeps_staging() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    let mut cfg = config();
    cfg.icons.insert(
        "Acme".into(),
        [("host".to_string(), dir.path().join("missing.png"))]
            .into_iter()
            .collect(),
    );

    let err = build_package(&cfg, &RandomPrefix::default(), Some(&CopyProcessor), &opts).unwrap_err();
    assert!(matches!(err, Error::Icon { .. }), "{err}");
    assert!(!opts.output.exists());
    assert!(opts.staging_dir.join("Servers/Local.tas").is_file());
}

#[test]
fn archive_failure_keeps_staging_and_previous_archive() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    fs::write(&opts.output, "previous").unwrap();
    // A directory where the partial archive would go makes the zip step fail.
    fs::create_dir(dir.path().join("config.mtz.partial")).unwrap();

    let err = build_package(&config(), &RandomPrefix::default(), None, &opts).unwrap_err();
    assert!(matches!(err, Error::Archive { .. }), "{err}");
    assert_eq!(fs::read_to_string(&opts.output).unwrap(), "previous");
    assert!(opts.staging_dir.join("Servers/Local.tas").is_file());
}

#[test]
fn staging_over_the_output_directory_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(&dir);
    opts.staging_dir = dir.path().to_path_buf();
    let keep = dir.path().join("config.yaml");
    fs::write(&keep, "keep").unwrap();
    opts.protect.push(keep.clone());

    let err = build_package(&config(), &RandomPrefix::default(), None, &opts).unwrap_err();
    assert!(matches!(err, Error::StagingRoot { .. }), "{err}");
    assert_eq!(fs::read_to_string(&keep).unwrap(), "keep");
}

#[test]
fn sets_differing_only_in_case_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);
    let mut cfg = config();
    cfg.transforms.get_mut("whois").unwrap().set = "network".into();

    let report = build_package(&cfg, &RandomPrefix::default(), None, &opts).unwrap();
    assert_eq!(report.sets, vec!["Network".to_string()]);

    let files = entries(&opts.output);
    let set = entry(&files, "TransformSets/network.set");
    for id in ["ACME.Domain2resolve", "ACME.IPv4Address2resolve", "ACME.Domain2whois"] {
        assert!(set.contains(&format!(r#"<Transform name="{id}"/>"#)), "{id}");
    }
}
