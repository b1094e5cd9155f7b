//! The GRIB2 parameter catalogue: Discipline → Category → Parameter.
//!
//! The tables are generated at build time from `data/parameters.tsv` into
//! dense arrays sorted by ascending (discipline, category, number), plus four
//! string-lookup indices. Ids ≥ 192 are center-local entries and may repeat a
//! standard entry's strings under a different number; id 255 is the "Missing"
//! terminator present at every level.

/// A GRIB2 product discipline (code table 0.0).
#[derive(Debug)]
pub struct Discipline {
    pub id: u8,
    name: &'static str,
    cat_start: usize,
    cat_end: usize,
}

/// A parameter category within a discipline (code table 4.1).
#[derive(Debug)]
pub struct Category {
    pub id: u8,
    pub discipline_id: u8,
    disc_index: usize,
    name: &'static str,
    par_start: usize,
    par_end: usize,
}

/// A parameter within a category (code table 4.2).
#[derive(Debug)]
pub struct Parameter {
    pub id: u8,
    pub category_id: u8,
    pub discipline_id: u8,
    cat_index: usize,
    name: &'static str,
    unit: Option<&'static str>,
    abbrev: Option<&'static str>,
}

include!(concat!(env!("OUT_DIR"), "/catalogue_data.rs"));

impl Discipline {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn categories(&self) -> &'static [Category] {
        &CATEGORIES[self.cat_start..self.cat_end]
    }

    pub fn find_category(&self, id: u8) -> Option<&'static Category> {
        let cats = self.categories();
        cats.binary_search_by_key(&id, |c| c.id).ok().map(|i| &cats[i])
    }
}

impl Category {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn discipline(&self) -> &'static Discipline {
        &DISCIPLINES[self.disc_index]
    }

    pub fn parameters(&self) -> &'static [Parameter] {
        &PARAMETERS[self.par_start..self.par_end]
    }

    pub fn find_parameter(&self, id: u8) -> Option<&'static Parameter> {
        let pars = self.parameters();
        pars.binary_search_by_key(&id, |p| p.id).ok().map(|i| &pars[i])
    }

    /// Packed `(discipline << 8) | category` id.
    pub fn full_id(&self) -> u16 {
        (self.discipline_id as u16) << 8 | self.id as u16
    }
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.unit
    }

    pub fn abbrev(&self) -> Option<&'static str> {
        self.abbrev
    }

    pub fn category(&self) -> &'static Category {
        &CATEGORIES[self.cat_index]
    }

    /// Packed `(discipline << 16) | (category << 8) | number` id.
    pub fn full_id(&self) -> u32 {
        (self.discipline_id as u32) << 16 | (self.category_id as u32) << 8 | self.id as u32
    }

    pub fn param_id(&self) -> ParamId {
        ParamId::new(self.discipline_id, self.category_id, self.id)
    }
}

/// The numeric identity of a parameter, kept independently of whether the
/// catalogue knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamId {
    pub discipline: u8,
    pub category: u8,
    pub number: u8,
}

impl ParamId {
    pub fn new(discipline: u8, category: u8, number: u8) -> Self {
        Self {
            discipline,
            category,
            number,
        }
    }

    pub fn from_packed(packed: u32) -> Self {
        Self {
            discipline: (packed >> 16) as u8,
            category: (packed >> 8) as u8,
            number: packed as u8,
        }
    }

    pub fn packed(&self) -> u32 {
        (self.discipline as u32) << 16 | (self.category as u32) << 8 | self.number as u32
    }

    /// The catalogue row for this id, if known.
    pub fn parameter(&self) -> Option<&'static Parameter> {
        find_parameter(self.discipline, self.category, self.number)
    }
}

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parameter() {
            Some(p) => write!(f, "{}", p.name()),
            None => write!(f, "{}/{}/{}", self.discipline, self.category, self.number),
        }
    }
}

// ===== Lookup by numeric id =====

pub fn find_discipline(id: u8) -> Option<&'static Discipline> {
    DISCIPLINES
        .binary_search_by_key(&id, |d| d.id)
        .ok()
        .map(|i| &DISCIPLINES[i])
}

pub fn find_category(discipline: u8, category: u8) -> Option<&'static Category> {
    find_discipline(discipline)?.find_category(category)
}

/// Lookup by packed `(discipline << 8) | category`.
pub fn find_category_packed(packed: u16) -> Option<&'static Category> {
    find_category((packed >> 8) as u8, packed as u8)
}

pub fn find_parameter(discipline: u8, category: u8, number: u8) -> Option<&'static Parameter> {
    find_category(discipline, category)?.find_parameter(number)
}

/// Lookup by packed `(discipline << 16) | (category << 8) | number`.
pub fn find_parameter_packed(packed: u32) -> Option<&'static Parameter> {
    find_parameter((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

// ===== Lookup by string =====

fn index_search<T, K: Ord + ?Sized + 'static>(
    index: &'static [u16],
    key: &K,
    get: impl Fn(usize) -> &'static T,
    get_key: impl Fn(&'static T) -> Option<&'static K>,
) -> Option<&'static T> {
    // Lower-bound search; ties in the index are ordered by table position,
    // so this returns the same row a linear scan would.
    let pos = index.partition_point(|&i| match get_key(get(i as usize)) {
        None => true,
        Some(k) => k < key,
    });
    if pos < index.len() {
        let row = get(index[pos] as usize);
        if get_key(row) == Some(key) {
            return Some(row);
        }
    }
    None
}

pub fn find_discipline_by_name(name: &str) -> Option<&'static Discipline> {
    index_search(
        DISCIPLINE_NAME_INDEX,
        name,
        |i| &DISCIPLINES[i],
        |d| Some(d.name),
    )
}

pub fn find_category_by_name(name: &str) -> Option<&'static Category> {
    index_search(
        CATEGORY_NAME_INDEX,
        name,
        |i| &CATEGORIES[i],
        |c| Some(c.name),
    )
}

pub fn find_parameter_by_name(name: &str) -> Option<&'static Parameter> {
    index_search(
        PARAMETER_NAME_INDEX,
        name,
        |i| &PARAMETERS[i],
        |p| Some(p.name),
    )
}

pub fn find_parameter_by_abbrev(abbrev: &str) -> Option<&'static Parameter> {
    index_search(
        PARAMETER_ABBREV_INDEX,
        abbrev,
        |i| &PARAMETERS[i],
        |p| p.abbrev,
    )
}

// ===== Iteration =====

pub fn disciplines() -> &'static [Discipline] {
    DISCIPLINES
}

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn parameters() -> &'static [Parameter] {
    PARAMETERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_temperature() {
        let p = find_parameter(0, 0, 0).expect("temperature");
        assert_eq!(p.name(), "Temperature");
        assert_eq!(p.unit(), Some("K"));
        assert_eq!(p.abbrev(), Some("TMP"));
        assert_eq!(p.full_id(), 0);
        assert_eq!(p.category().name(), "Temperature");
        assert_eq!(p.category().discipline().name(), "Meteorological Products");
    }

    #[test]
    fn test_find_relative_humidity() {
        let p = find_parameter(0, 1, 1).expect("rh");
        assert_eq!(p.abbrev(), Some("RH"));
        assert_eq!(p.unit(), Some("%"));
    }

    #[test]
    fn test_unknown_ids_return_none() {
        assert!(find_discipline(42).is_none());
        assert!(find_category(0, 200).is_none());
        assert!(find_parameter(0, 0, 250).is_none());
        assert!(find_parameter_by_abbrev("NOSUCHABBREV").is_none());
        assert!(find_parameter_by_name("No Such Parameter").is_none());
    }

    #[test]
    fn test_missing_terminators() {
        // Every level has an id-255 Missing row.
        let d = find_discipline(255).expect("missing discipline");
        assert_eq!(d.name(), "Missing");
        for disc in disciplines() {
            assert!(disc.find_category(255).is_some(), "discipline {}", disc.id);
        }
        for cat in categories() {
            let m = cat.find_parameter(255).expect("missing parameter");
            assert_eq!(m.name(), "Missing");
            assert!(m.abbrev().is_none());
        }
    }

    #[test]
    fn test_dense_ascending_order() {
        let mut last = None;
        for p in parameters() {
            let key = (p.discipline_id, p.category_id, p.id);
            if let Some(prev) = last {
                assert!(key > prev, "parameters not strictly ascending at {key:?}");
            }
            last = Some(key);
        }
    }

    #[test]
    fn test_non_missing_rows_have_abbrev() {
        for p in parameters() {
            if p.id != 255 {
                assert!(
                    p.abbrev().is_some(),
                    "parameter {}/{}/{} lacks abbreviation",
                    p.discipline_id,
                    p.category_id,
                    p.id
                );
            }
        }
    }

    #[test]
    fn test_indices_sorted_and_agree_with_linear_scan() {
        // Index key sequences are non-decreasing.
        let keys: Vec<_> = PARAMETER_ABBREV_INDEX
            .iter()
            .map(|&i| PARAMETERS[i as usize].abbrev)
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        let names: Vec<_> = PARAMETER_NAME_INDEX
            .iter()
            .map(|&i| PARAMETERS[i as usize].name)
            .collect();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));

        // Binary search returns what a linear scan would find.
        for probe in ["TMP", "RH", "UGRD", "VGRD", "APCP", "CAPE"] {
            let linear = parameters()
                .iter()
                .find(|p| p.abbrev == Some(probe))
                .map(|p| p as *const Parameter);
            let binary = find_parameter_by_abbrev(probe).map(|p| p as *const Parameter);
            assert_eq!(linear, binary, "abbrev {probe}");
        }
        for probe in ["Temperature", "Relative Humidity", "Missing"] {
            let linear = parameters()
                .iter()
                .find(|p| p.name == probe)
                .map(|p| p as *const Parameter);
            let binary = find_parameter_by_name(probe).map(|p| p as *const Parameter);
            assert_eq!(linear, binary, "name {probe}");
        }
    }

    #[test]
    fn test_local_duplicates_retained() {
        // 0/0/16 and 0/0/192 are both "Snow Phase Change Heat Flux"; the
        // vendor-local duplicate keeps its own numeric id.
        let std = find_parameter(0, 0, 16).expect("snohf std");
        let local = find_parameter(0, 0, 192).expect("snohf local");
        assert_eq!(std.name(), local.name());
        assert_eq!(std.abbrev(), local.abbrev());
        assert_ne!(std.full_id(), local.full_id());
    }

    #[test]
    fn test_param_id_packing() {
        let id = ParamId::new(0, 2, 2);
        assert_eq!(id.packed(), 0x0202);
        assert_eq!(ParamId::from_packed(0x0202), id);
        assert_eq!(id.parameter().unwrap().abbrev(), Some("UGRD"));
        assert_eq!(find_parameter_packed(0x0202).unwrap().abbrev(), Some("UGRD"));
    }
}
