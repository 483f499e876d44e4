//! Snapshot tests for the rendered report.

#![allow(clippy::unwrap_used)]

use knucleotide::{config::Config, run::report};

const SCENARIO: &[u8] = b">ONE\nACGT\n>TWO\nTTTT\n>THREE\nGGTATTTTAATTTATAGTA\n";

#[test]
fn scenario_text_report() {
    let report = report(SCENARIO, &Config::new()).unwrap();
    insta::assert_snapshot!(report.to_string(), @r"
    T 52.632
    A 31.579
    G 15.789

    TA 27.778
    TT 27.778
    AT 16.667
    GT 11.111
    AA 5.556
    AG 5.556
    GG 5.556

    1	GGT
    1	GGTA
    1	GGTATT
    1	GGTATTTTAATT
    1	GGTATTTTAATTTATAGT
    ");
}

#[test]
fn scenario_json_counts() {
    let report = report(SCENARIO, &Config::new()).unwrap();
    let counts = serde_json::to_string(&report.counts).unwrap();
    insta::assert_snapshot!(counts, @r#"[{"kmer":"GGT","count":1},{"kmer":"GGTA","count":1},{"kmer":"GGTATT","count":1},{"kmer":"GGTATTTTAATT","count":1},{"kmer":"GGTATTTTAATTTATAGT","count":1}]"#);
}
