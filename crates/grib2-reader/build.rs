//! Compiles the GRIB2 parameter description (`data/parameters.tsv`) into the
//! static catalogue tables and lookup indices included by `src/catalogue.rs`.
//!
//! The TSV is a flattened three-level hierarchy: `D` rows open a discipline,
//! `C` rows a category within it, `P` rows a parameter within that. Rules
//! applied here, not at runtime: abbreviation-less parameters other than the
//! id-255 "Missing" entry are dropped, duplicate numeric triples are dropped,
//! and every level is terminated with a single id-255 "Missing" row.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Clone)]
struct ParamRow {
    id: u8,
    name: String,
    unit: Option<String>,
    abbrev: Option<String>,
}

struct CatRow {
    id: u8,
    name: String,
    params: Vec<ParamRow>,
}

struct DiscRow {
    id: u8,
    name: String,
    cats: Vec<CatRow>,
}

fn missing_param() -> ParamRow {
    ParamRow {
        id: 255,
        name: "Missing".to_string(),
        unit: None,
        abbrev: None,
    }
}

fn parse_tsv(text: &str) -> Vec<DiscRow> {
    let mut discs: Vec<DiscRow> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let tag = fields[0];
        let id: u8 = fields[1]
            .parse()
            .unwrap_or_else(|_| panic!("parameters.tsv:{}: bad id", lineno + 1));
        let name = fields[2].to_string();
        match tag {
            "D" => discs.push(DiscRow {
                id,
                name,
                cats: Vec::new(),
            }),
            "C" => {
                let disc = discs.last_mut().expect("C row before any D row");
                disc.cats.push(CatRow {
                    id,
                    name,
                    params: Vec::new(),
                });
            }
            "P" => {
                let cat = discs
                    .last_mut()
                    .and_then(|d| d.cats.last_mut())
                    .expect("P row before any C row");
                let opt = |s: &str| {
                    if s.is_empty() {
                        None
                    } else {
                        Some(s.to_string())
                    }
                };
                cat.params.push(ParamRow {
                    id,
                    name,
                    unit: opt(fields.get(3).copied().unwrap_or("")),
                    abbrev: opt(fields.get(4).copied().unwrap_or("")),
                });
            }
            other => panic!("parameters.tsv:{}: unknown tag {:?}", lineno + 1, other),
        }
    }
    discs
}

fn opt_str(s: &Option<String>) -> String {
    match s {
        Some(v) => format!("Some({:?})", v),
        None => "None".to_string(),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=data/parameters.tsv");
    println!("cargo:rerun-if-changed=build.rs");

    let text = fs::read_to_string("data/parameters.tsv").expect("read data/parameters.tsv");
    let mut discs = parse_tsv(&text);

    // Terminator rows: one Missing discipline, one Missing category per
    // discipline, one Missing parameter per category.
    if !discs.iter().any(|d| d.id == 255) {
        discs.push(DiscRow {
            id: 255,
            name: "Missing".to_string(),
            cats: Vec::new(),
        });
    }
    for disc in &mut discs {
        if !disc.cats.iter().any(|c| c.id == 255) {
            disc.cats.push(CatRow {
                id: 255,
                name: "Missing".to_string(),
                params: Vec::new(),
            });
        }
        for cat in &mut disc.cats {
            if !cat.params.iter().any(|p| p.id == 255) {
                cat.params.push(missing_param());
            }
        }
    }

    // Filter and dedup within each category, then order every level by id so
    // the emitted indices are dense in ascending (discipline, category,
    // number).
    discs.sort_by_key(|d| d.id);
    for disc in &mut discs {
        disc.cats.sort_by_key(|c| c.id);
        for cat in &mut disc.cats {
            let mut kept: BTreeMap<u8, ParamRow> = BTreeMap::new();
            for par in cat.params.drain(..) {
                if par.abbrev.is_none() && par.id != 255 {
                    println!(
                        "cargo:warning=parameter {}/{}/{} ({}) has no abbreviation, dropped",
                        disc.id, cat.id, par.id, par.name
                    );
                    continue;
                }
                if kept.contains_key(&par.id) {
                    println!(
                        "cargo:warning=duplicate parameter {}/{}/{} ({}) dropped",
                        disc.id, cat.id, par.id, par.name
                    );
                    continue;
                }
                kept.insert(par.id, par);
            }
            cat.params = kept.into_values().collect();
        }
    }

    // Flatten with back-reference indices.
    let mut out = String::new();
    out.push_str("// Generated by build.rs from data/parameters.tsv. Do not edit.\n\n");

    let mut categories = Vec::new(); // (disc_index, CatRow)
    let mut parameters = Vec::new(); // (cat_index, disc_id, cat_id, ParamRow)
    for (di, disc) in discs.iter().enumerate() {
        for cat in &disc.cats {
            let ci = categories.len();
            for par in &cat.params {
                parameters.push((ci, disc.id, cat.id, par.clone()));
            }
            categories.push((di, disc.id, cat));
        }
    }

    writeln!(out, "pub(crate) static DISCIPLINES: &[Discipline] = &[").unwrap();
    let mut cat_cursor = 0usize;
    for disc in &discs {
        let start = cat_cursor;
        cat_cursor += disc.cats.len();
        writeln!(
            out,
            "    Discipline {{ id: {}, name: {:?}, cat_start: {}, cat_end: {} }},",
            disc.id, disc.name, start, cat_cursor
        )
        .unwrap();
    }
    writeln!(out, "];\n").unwrap();

    writeln!(out, "pub(crate) static CATEGORIES: &[Category] = &[").unwrap();
    let mut par_cursor = 0usize;
    for (di, disc_id, cat) in &categories {
        let start = par_cursor;
        par_cursor += cat.params.len();
        writeln!(
            out,
            "    Category {{ id: {}, discipline_id: {}, disc_index: {}, name: {:?}, par_start: {}, par_end: {} }},",
            cat.id, disc_id, di, cat.name, start, par_cursor
        )
        .unwrap();
    }
    writeln!(out, "];\n").unwrap();

    writeln!(out, "pub(crate) static PARAMETERS: &[Parameter] = &[").unwrap();
    for (ci, disc_id, cat_id, par) in &parameters {
        writeln!(
            out,
            "    Parameter {{ id: {}, category_id: {}, discipline_id: {}, cat_index: {}, name: {:?}, unit: {}, abbrev: {} }},",
            par.id,
            cat_id,
            disc_id,
            ci,
            par.name,
            opt_str(&par.unit),
            opt_str(&par.abbrev),
        )
        .unwrap();
    }
    writeln!(out, "];\n").unwrap();

    // Lookup indices: byte-wise comparison on the key, absent keys first,
    // ties broken by table position so binary and linear search agree.
    let mut disc_idx: Vec<usize> = (0..discs.len()).collect();
    disc_idx.sort_by_key(|&i| (discs[i].name.clone(), i));
    write_index(&mut out, "DISCIPLINE_NAME_INDEX", &disc_idx);

    let mut cat_idx: Vec<usize> = (0..categories.len()).collect();
    cat_idx.sort_by_key(|&i| (categories[i].2.name.clone(), i));
    write_index(&mut out, "CATEGORY_NAME_INDEX", &cat_idx);

    let mut par_name_idx: Vec<usize> = (0..parameters.len()).collect();
    par_name_idx.sort_by_key(|&i| (parameters[i].3.name.clone(), i));
    write_index(&mut out, "PARAMETER_NAME_INDEX", &par_name_idx);

    let mut par_abbrev_idx: Vec<usize> = (0..parameters.len()).collect();
    par_abbrev_idx.sort_by_key(|&i| (parameters[i].3.abbrev.clone(), i));
    write_index(&mut out, "PARAMETER_ABBREV_INDEX", &par_abbrev_idx);

    let dest = Path::new(&env::var("OUT_DIR").unwrap()).join("catalogue_data.rs");
    fs::write(dest, out).expect("write catalogue_data.rs");
}

fn write_index(out: &mut String, name: &str, indices: &[usize]) {
    writeln!(out, "pub(crate) static {}: &[u16] = &[", name).unwrap();
    for chunk in indices.chunks(16) {
        let row: Vec<String> = chunk.iter().map(|i| i.to_string()).collect();
        writeln!(out, "    {},", row.join(", ")).unwrap();
    }
    writeln!(out, "];\n").unwrap();
}
