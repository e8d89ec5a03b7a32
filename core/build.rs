use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use uncased::UncasedStr;

/// Words reserved under every dialect.
const CORE_KEYWORDS: &[(&str, &str)] = &[
    ("ALL", "All"),
    ("AND", "And"),
    ("AS", "As"),
    ("ASC", "Asc"),
    ("BETWEEN", "Between"),
    ("BY", "By"),
    ("CASE", "Case"),
    ("CROSS", "Cross"),
    ("DELETE", "Delete"),
    ("DESC", "Desc"),
    ("DISTINCT", "Distinct"),
    ("ELSE", "Else"),
    ("END", "End"),
    ("EXISTS", "Exists"),
    ("EXPLAIN", "Explain"),
    ("FOR", "For"),
    ("FROM", "From"),
    ("FULL", "Full"),
    ("GROUP", "Group"),
    ("HAVING", "Having"),
    ("IN", "In"),
    ("INNER", "Inner"),
    ("INSERT", "Insert"),
    ("INTO", "Into"),
    ("IS", "Is"),
    ("JOIN", "Join"),
    ("LEFT", "Left"),
    ("LIKE", "Like"),
    ("NOT", "Not"),
    ("NULL", "Null"),
    ("ON", "On"),
    ("OR", "Or"),
    ("ORDER", "Order"),
    ("OUTER", "Outer"),
    ("RIGHT", "Right"),
    ("SELECT", "Select"),
    ("SET", "Set"),
    ("THEN", "Then"),
    ("UNION", "Union"),
    ("UPDATE", "Update"),
    ("VALUES", "Values"),
    ("WHEN", "When"),
    ("WHERE", "Where"),
];

/// Words the generic dialect reserves on top of the core set.
const GENERIC_KEYWORDS: &[(&str, &str)] = &[("LIMIT", "Limit"), ("OFFSET", "Offset")];

/// Words the MySQL family reserves on top of the core set.
const MYSQL_KEYWORDS: &[(&str, &str)] = &[
    ("LIMIT", "Limit"),
    ("OFFSET", "Offset"),
    ("STRAIGHT_JOIN", "StraightJoin"),
];

/// Words the Oracle family reserves on top of the core set.
const ORACLE_KEYWORDS: &[(&str, &str)] = &[
    ("CONNECT", "Connect"),
    ("LEVEL", "Level"),
    ("MINUS", "Minus"),
    ("ROWNUM", "Rownum"),
    ("SYSDATE", "Sysdate"),
];

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir).join("keywords.rs");
    let mut file = BufWriter::new(File::create(out_path).unwrap());
    write_map(&mut file, "GENERIC_KEYWORDS", GENERIC_KEYWORDS);
    write_map(&mut file, "MYSQL_KEYWORDS", MYSQL_KEYWORDS);
    write_map(&mut file, "ORACLE_KEYWORDS", ORACLE_KEYWORDS);
    println!("cargo:rerun-if-changed=build.rs");
}

fn write_map(file: &mut impl Write, name: &str, extra: &[(&str, &str)]) {
    let mut map = phf_codegen::Map::new();
    for &(word, variant) in CORE_KEYWORDS.iter().chain(extra) {
        map.entry(UncasedStr::new(word), &format!("Keyword::{variant}"));
    }
    writeln!(
        file,
        "static {}: ::phf::Map<&'static UncasedStr, Keyword> = {};",
        name,
        map.build()
    )
    .unwrap();
}
