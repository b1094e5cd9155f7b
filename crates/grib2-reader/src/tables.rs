//! Static GRIB2 reference tables: originating centers, generating processes,
//! production statuses, data types, surface types, and time-range units.
//!
//! Unlike the parameter catalogue these are small enough to keep as plain
//! source. Center rows own their sub-center and generating-process-subtype
//! lists; child lists are short and scanned linearly.

/// An `(id, text)` row keyed by a one-byte code.
pub type IdText = (u8, &'static str);

/// An `(id, text)` row keyed by a two-byte code.
pub type IdText16 = (u16, &'static str);

/// A fixed-surface type (code table 4.5) with an optional unit.
#[derive(Debug)]
pub struct SurfaceType {
    pub id: u8,
    pub text: &'static str,
    pub unit: Option<&'static str>,
}

/// An originating center (common code table C-1) with its sub-centers and
/// generating-process subtypes.
#[derive(Debug)]
pub struct Center {
    pub id: u16,
    pub text: &'static str,
    pub subcenters: &'static [IdText16],
    pub process_types: &'static [IdText],
}

/// Indicator of unit of time range (code table 4.4).
static TIME_RANGE_UNITS: &[IdText] = &[
    (0, "Minute"),
    (1, "Hour"),
    (2, "Day"),
    (3, "Month"),
    (4, "Year"),
    (5, "Decade"),
    (6, "Normal (30 Years)"),
    (7, "Century"),
    (10, "3 Hours"),
    (11, "6 Hours"),
    (12, "12 Hours"),
    (13, "Second"),
    (255, "Missing"),
];

static GENERATING_PROCESSES: &[IdText] = &[
    (0, "Analysis"),
    (1, "Initialization"),
    (2, "Forecast"),
    (3, "Bias Corrected Forecast"),
    (4, "Ensemble Forecast"),
    (5, "Probability Forecast"),
    (6, "Forecast Error"),
    (7, "Analysis Error"),
    (8, "Observation"),
    (9, "Climatological"),
    (10, "Probability-Weighted Forecast"),
    (11, "Bias-Corrected Ensemble Forecast"),
    (192, "Forecast Confidence Indicator"),
    (255, "Missing"),
];

static PRODUCTION_STATUSES: &[IdText] = &[
    (0, "Operational Products"),
    (1, "Operational Test Products"),
    (2, "Research Products"),
    (3, "Re-Analysis Products"),
    (4, "THORPEX Interactive Grand Global Ensemble (TIGGE)"),
    (5, "THORPEX Interactive Grand Global Ensemble (TIGGE) test"),
    (255, "Missing"),
];

static DATA_TYPES: &[IdText] = &[
    (0, "Analysis Products"),
    (1, "Forecast Products"),
    (2, "Analysis and Forecast Products"),
    (3, "Control Forecast Products"),
    (4, "Perturbed Forecast Products"),
    (5, "Control and Perturbed Forecast Products"),
    (6, "Processed Satellite Observations"),
    (7, "Processed Radar Observations"),
    (8, "Event Probability"),
    (255, "Missing"),
];

static SUBCENTERS_NCEP: &[IdText16] = &[
    (1, "NCEP Re-Analysis Project"),
    (2, "NCEP Ensemble Products"),
    (3, "NCEP Central Operations"),
    (4, "Environmental Modeling Center"),
    (5, "Hydrometeorological Prediction Center"),
    (6, "Marine Prediction Center"),
    (7, "Climate Prediction Center"),
    (8, "Aviation Weather Center"),
    (9, "Storm Prediction Center"),
    (10, "National Hurricane Prediction Center"),
    (11, "NWS Techniques Development Laboratory"),
    (12, "NESDIS Office of Research and Applications"),
    (13, "Federal Aviation Administration"),
    (14, "NWS Meteorological Development Laboratory"),
    (15, "North American Regional Reanalysis Project"),
    (16, "Space Weather Prediction Center"),
];

static PROCESS_TYPES_NCEP: &[IdText] = &[
    (2, "Ultra Violet Index Model"),
    (3, "NCEP/ARL Transport and Dispersion Model"),
    (4, "NCEP/ARL Smoke Model"),
    (5, "Satellite Derived Precipitation and temperatures, from IR (See PDS Octet 41... for specific satellite ID)"),
    (6, "NCEP/ARL Dust Model"),
    (10, "Global Wind-Wave Forecast Model"),
    (11, "Global Multi-Grid Wave Model (Static Grids)"),
    (12, "Probabilistic Storm Surge"),
    (13, "Hurricane Multi-Grid Wave Model"),
    (14, "Extratropical Storm Surge Model"),
    (19, "Limited-area Fine Mesh (LFM) analysis"),
    (25, "Snow Cover Analysis"),
    (30, "Forecaster generated field"),
    (31, "Value added post processed field"),
    (39, "Nested Grid forecast Model (NGM)"),
    (42, "Global Optimum Interpolation Analysis (GOI) from GFS model"),
    (43, "Global Optimum Interpolation Analysis (GOI) from \"Final\" run"),
    (44, "Sea Surface Temperature Analysis"),
    (45, "Coastal Ocean Circulation Model"),
    (46, "HYCOM - Global"),
    (47, "HYCOM - North Pacific basin"),
    (48, "HYCOM - North Atlantic basin"),
    (49, "Ozone Analysis from TIROS Observations"),
    (52, "Ozone Analysis from Nimbus 7 Observations"),
    (53, "LFM-Fourth Order Forecast Model"),
    (64, "Regional Optimum Interpolation Analysis (ROI)"),
    (68, "80 wave triangular, 18-layer Spectral model from GFS model"),
    (69, "80 wave triangular, 18 layer Spectral model from \"Medium Range Forecast\" run"),
    (70, "Quasi-Lagrangian Hurricane Model (QLM)"),
    (73, "Fog Forecast model - Ocean Prod. Center"),
    (74, "Gulf of Mexico Wind/Wave"),
    (75, "Gulf of Alaska Wind/Wave"),
    (76, "Bias corrected Medium Range Forecast"),
    (77, "126 wave triangular, 28 layer Spectral model from GFS model"),
    (78, "126 wave triangular, 28 layer Spectral model from \"Medium Range Forecast\" run"),
    (79, "Backup from the previous run"),
    (80, "62 wave triangular, 28 layer Spectral model from \"Medium Range Forecast\" run"),
    (81, "Analysis from GFS (Global Forecast System)"),
    (82, "Analysis from GDAS (Global Data Assimilation System)"),
    (84, "MESO NAM Model (currently 12 km)"),
    (85, "Real Time Ocean Forecast System (RTOFS)"),
    (86, "RUC Model, from Forecast Systems Lab (isentropic; scale: 60km at 40N)"),
    (87, "CAC Ensemble Forecasts from Spectral (ENSMB)"),
    (88, "NOAA Wave Watch III (NWW3) Ocean Wave Model"),
    (89, "Non-hydrostatic Meso Model (NMM) (Currently 8 km)"),
    (90, "62 wave triangular, 28 layer spectral model extension of the \"Medium Range Forecast\" run"),
    (91, "62 wave triangular, 28 layer spectral model extension of the GFS model"),
    (92, "62 wave triangular, 28 layer spectral model run from the \"Medium Range Forecast\" final analysis"),
    (93, "62 wave triangular, 28 layer spectral model run from the T62 GDAS analysis of the \"Medium Range Forecast\" run"),
    (94, "T170/L42 Global Spectral Model from MRF run"),
    (95, "T126/L42 Global Spectral Model from MRF run"),
    (96, "Global Forecast System Model, T574 - Forecast hours 00-192, T190 - Forecast hours 204 - 384"),
    (98, "Climate Forecast System Model -- Atmospheric model (GFS) coupled to a multi level ocean model. Currently GFS spectral model at T62, 64 levels coupled to 40 level MOM3 ocean model."),
    (99, "Miscellaneous Test ID"),
    (100, "RUC Surface Analysis (scale: 60km at 40N)"),
    (101, "RUC Surface Analysis (scale: 40km at 40N)"),
    (105, "RUC Model from FSL (isentropic; scale: 20km at 40N)"),
    (107, "Global Ensemble Forecast System (GEFS)"),
    (108, "LAMP"),
    (109, "RTMA (Real Time Mesoscale Analysis)"),
    (110, "NAM Model - 15km version"),
    (111, "NAM model, generic resolution (Used in SREF processing)"),
    (112, "WRF-NMM model, generic resolution (Used in various runs) NMM=Nondydrostatic Mesoscale Model (NCEP)"),
    (113, "Products from NCEP SREF processing"),
    (114, "NAEFS Products from joined NCEP, CMC global ensembles"),
    (115, "Downscaled GFS from NAM eXtension"),
    (116, "WRF-EM model, generic resolution (Used in various runs) EM - Eulerian Mass-core (NCAR - aka Advanced Research WRF)"),
    (117, "NEMS GFS Aerosol Component"),
    (120, "Ice Concentration Analysis"),
    (121, "Western North Atlantic Regional Wave Model"),
    (122, "Alaska Waters Regional Wave Model"),
    (123, "North Atlantic Hurricane Wave Model"),
    (124, "Eastern North Pacific Regional Wave Model"),
    (125, "North Pacific Hurricane Wave Model"),
    (126, "Sea Ice Forecast Model"),
    (127, "Lake Ice Forecast Model"),
    (128, "Global Ocean Forecast Model"),
    (129, "Global Ocean Data Analysis System (GODAS)"),
    (130, "Merge of fields from the RUC, NAM, and Spectral Model"),
    (131, "Great Lakes Wave Model"),
    (140, "North American Regional Reanalysis (NARR)"),
    (141, "Land Data Assimilation and Forecast System"),
    (150, "NWS River Forecast System (NWSRFS)"),
    (151, "NWS Flash Flood Guidance System (NWSFFGS)"),
    (152, "WSR-88D Stage II Precipitation Analysis"),
    (153, "WSR-88D Stage III Precipitation Analysis"),
    (180, "Quantitative Precipitation Forecast generated by NCEP"),
    (181, "River Forecast Center Quantitative Precipitation Forecast mosaic generated by NCEP"),
    (182, "River Forecast Center Quantitative Precipitation estimate mosaic generated by NCEP"),
    (183, "NDFD product generated by NCEP/HPC"),
    (184, "Climatological Calibrated Precipitation Analysis - CCPA"),
    (190, "National Convective Weather Diagnostic generated by NCEP/AWC"),
    (191, "Current Icing Potential automated product genterated by NCEP/AWC"),
    (192, "Analysis product from NCEP/AWC"),
    (193, "Forecast product from NCEP/AWC"),
    (195, "Climate Data Assimilation System 2 (CDAS2)"),
    (196, "Climate Data Assimilation System 2 (CDAS2) - used for regeneration runs"),
    (197, "Climate Data Assimilation System (CDAS)"),
    (198, "Climate Data Assimilation System (CDAS) - used for regeneration runs"),
    (199, "Climate Forecast System Reanalysis (CFSR) -- Atmospheric model (GFS) coupled to a multi level ocean, land and seaice model. Currently GFS spectral model at T382, 64 levels coupled to 40 level MOM4 ocean model."),
    (200, "CPC Manual Forecast Product"),
    (201, "CPC Automated Product"),
    (210, "EPA Air Quality Forecast - Currently North East US domain"),
    (211, "EPA Air Quality Forecast - Currently Eastern US domain"),
    (215, "SPC Manual Forecast Product"),
    (220, "NCEP/OPC automated product"),
    (255, "Missing"),
];

static SURFACE_TYPES: &[SurfaceType] = &[
    SurfaceType { id: 1, text: "Ground or Water Surface", unit: None },
    SurfaceType { id: 2, text: "Cloud Base Level", unit: None },
    SurfaceType { id: 3, text: "Level of Cloud Tops", unit: None },
    SurfaceType { id: 4, text: "Level of 0degC Isotherm", unit: None },
    SurfaceType { id: 5, text: "Level of Adiabatic Condensation Lifted from the Surface", unit: None },
    SurfaceType { id: 6, text: "Maximum Wind Level", unit: None },
    SurfaceType { id: 7, text: "Tropopause", unit: None },
    SurfaceType { id: 8, text: "Nominal Top of the Atmosphere", unit: None },
    SurfaceType { id: 9, text: "Sea Bottom", unit: None },
    SurfaceType { id: 10, text: "Entire Atmosphere", unit: None },
    SurfaceType { id: 11, text: "Cumulonimbus Base (CB)", unit: Some("m") },
    SurfaceType { id: 12, text: "Cumulonimbus Top (CT)", unit: Some("m") },
    SurfaceType { id: 20, text: "Isothermal Level", unit: Some("K") },
    SurfaceType { id: 100, text: "Isobaric Surface", unit: Some("Pa") },
    SurfaceType { id: 101, text: "Mean Sea Level", unit: None },
    SurfaceType { id: 102, text: "Specific Altitude Above Mean Sea Level", unit: Some("m") },
    SurfaceType { id: 103, text: "Specified Height Level Above Ground", unit: Some("m") },
    SurfaceType { id: 104, text: "Sigma Level", unit: None },
    SurfaceType { id: 105, text: "Hybrid Level", unit: None },
    SurfaceType { id: 106, text: "Depth Below Land Surface", unit: Some("m") },
    SurfaceType { id: 107, text: "Isentropic (theta) Level", unit: Some("K") },
    SurfaceType { id: 108, text: "Level at Specified Pressure Difference from Ground to Level", unit: Some("Pa") },
    SurfaceType { id: 109, text: "Potential Vorticity Surface", unit: Some("K m^2 kg^-1 s^-1") },
    SurfaceType { id: 111, text: "Eta Level", unit: None },
    SurfaceType { id: 113, text: "Logarithmic Hybrid Coordinate", unit: None },
    SurfaceType { id: 117, text: "Mixed Layer Depth", unit: Some("m") },
    SurfaceType { id: 118, text: "Hybrid Height Level", unit: None },
    SurfaceType { id: 119, text: "Hybrid Pressure Level", unit: None },
    SurfaceType { id: 120, text: "Pressure Thickness", unit: Some("Pa") },
    SurfaceType { id: 150, text: "Generalized Vertical Height Coordinate", unit: None },
    SurfaceType { id: 160, text: "Depth Below Sea Level", unit: Some("m") },
    SurfaceType { id: 161, text: "Depth Below Water Surface", unit: Some("m") },
    SurfaceType { id: 162, text: "Lake or River Bottom", unit: None },
    SurfaceType { id: 163, text: "Bottom Of Sediment Layer", unit: None },
    SurfaceType { id: 164, text: "Bottom Of Thermally Active Sediment Layer", unit: None },
    SurfaceType { id: 165, text: "Bottom Of Sediment Layer Penetrated By Thermal Wave", unit: None },
    SurfaceType { id: 166, text: "Maxing Layer", unit: None },
    SurfaceType { id: 170, text: "Ionospheric D-region Level", unit: None },
    SurfaceType { id: 171, text: "Ionospheric E-region Level", unit: None },
    SurfaceType { id: 172, text: "Ionospheric F1-region Level", unit: None },
    SurfaceType { id: 173, text: "Ionospheric F2-region Level", unit: None },
    SurfaceType { id: 200, text: "Entire atmosphere (considered as a single layer)", unit: None },
    SurfaceType { id: 201, text: "Entire ocean (considered as a single layer)", unit: None },
    SurfaceType { id: 204, text: "Highest tropospheric freezing level", unit: None },
    SurfaceType { id: 206, text: "Grid scale cloud bottom level", unit: None },
    SurfaceType { id: 207, text: "Grid scale cloud top level", unit: None },
    SurfaceType { id: 209, text: "Boundary layer cloud bottom level", unit: None },
    SurfaceType { id: 210, text: "Boundary layer cloud top level", unit: None },
    SurfaceType { id: 211, text: "Boundary layer cloud layer", unit: None },
    SurfaceType { id: 212, text: "Low cloud bottom level", unit: None },
    SurfaceType { id: 213, text: "Low cloud top level", unit: None },
    SurfaceType { id: 214, text: "Low cloud layer", unit: None },
    SurfaceType { id: 215, text: "Cloud ceiling", unit: None },
    SurfaceType { id: 220, text: "Planetary Boundary Layer", unit: None },
    SurfaceType { id: 221, text: "Layer Between Two Hybrid Levels", unit: None },
    SurfaceType { id: 222, text: "Middle cloud bottom level", unit: None },
    SurfaceType { id: 223, text: "Middle cloud top level", unit: None },
    SurfaceType { id: 224, text: "Middle cloud layer", unit: None },
    SurfaceType { id: 232, text: "High cloud bottom level", unit: None },
    SurfaceType { id: 233, text: "High cloud top level", unit: None },
    SurfaceType { id: 234, text: "High cloud layer", unit: None },
    SurfaceType { id: 235, text: "Ocean Isotherm Level", unit: Some("1/10degC") },
    SurfaceType { id: 236, text: "Layer between two depths below ocean surface", unit: None },
    SurfaceType { id: 237, text: "Bottom of Ocean Mixed Layer", unit: Some("m") },
    SurfaceType { id: 238, text: "Bottom of Ocean Isothermal Layer", unit: Some("m") },
    SurfaceType { id: 239, text: "Layer Ocean Surface and 26C Ocean Isothermal Level", unit: None },
    SurfaceType { id: 240, text: "Ocean Mixed Layer", unit: None },
    SurfaceType { id: 241, text: "Ordered Sequence of Data", unit: None },
    SurfaceType { id: 242, text: "Convective cloud bottom level", unit: None },
    SurfaceType { id: 243, text: "Convective cloud top level", unit: None },
    SurfaceType { id: 244, text: "Convective cloud layer", unit: None },
    SurfaceType { id: 245, text: "Lowest level of the wet bulb zero", unit: None },
    SurfaceType { id: 246, text: "Maximum equivalent potential temperature level", unit: None },
    SurfaceType { id: 247, text: "Equilibrium level", unit: None },
    SurfaceType { id: 248, text: "Shallow convective cloud bottom level", unit: None },
    SurfaceType { id: 249, text: "Shallow convective cloud top level", unit: None },
    SurfaceType { id: 251, text: "Deep convective cloud bottom level", unit: None },
    SurfaceType { id: 252, text: "Deep convective cloud top level", unit: None },
    SurfaceType { id: 253, text: "Lowest bottom level of supercooled liquid water layer", unit: None },
    SurfaceType { id: 254, text: "Highest top level of supercooled liquid water layer", unit: None },
    SurfaceType { id: 255, text: "Missing", unit: None },
];

static CENTERS: &[Center] = &[
    Center { id: 1, text: "Melbourne (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 2, text: "Melbourne (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 3, text: "Melbourne (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 4, text: "Moscow (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 5, text: "Moscow (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 6, text: "Moscow (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 7, text: "US National Weather Service - NCEP (WMC)", subcenters: SUBCENTERS_NCEP, process_types: PROCESS_TYPES_NCEP },
    Center { id: 8, text: "US National Weather Service - NWSTG (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 9, text: "US National Weather Service - Other (WMC)", subcenters: &[], process_types: &[] },
    Center { id: 10, text: "Cairo (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 11, text: "Cairo (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 12, text: "Dakar (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 13, text: "Dakar (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 14, text: "Nairobi (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 15, text: "Nairobi (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 16, text: "Casablanca (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 17, text: "Tunis (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 18, text: "Tunis-Casablanca (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 19, text: "Tunis-Casablanca (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 20, text: "Las Palmas (RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 21, text: "Algiers (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 22, text: "ACMAD", subcenters: &[], process_types: &[] },
    Center { id: 23, text: "Mozambique (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 24, text: "Pretoria (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 25, text: "La Reunion (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 26, text: "Khabarovsk (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 27, text: "Khabarovsk (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 28, text: "New Delhi (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 29, text: "New Delhi (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 30, text: "Novosibirsk (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 31, text: "Novosibirsk (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 32, text: "Tashkent (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 33, text: "Jeddah (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 34, text: "Tokyo (RSMC), Japanese Meteorological Agency", subcenters: &[], process_types: &[] },
    Center { id: 35, text: "Tokyo (RSMC), Japanese Meteorological Agency", subcenters: &[], process_types: &[] },
    Center { id: 36, text: "Bankok", subcenters: &[], process_types: &[] },
    Center { id: 37, text: "Ulan Bator", subcenters: &[], process_types: &[] },
    Center { id: 38, text: "Beijing (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 39, text: "Beijing (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 40, text: "Seoul", subcenters: &[], process_types: &[] },
    Center { id: 41, text: "Buenos Aires (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 42, text: "Buenos Aires (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 43, text: "Brasilia (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 44, text: "Brasilia (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 45, text: "Santiago", subcenters: &[], process_types: &[] },
    Center { id: 46, text: "Brazilian Space Agency - INPE", subcenters: &[], process_types: &[] },
    Center { id: 47, text: "Columbia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 48, text: "Ecuador (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 49, text: "Peru (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 50, text: "Venezuela (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 51, text: "Miami (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 52, text: "Miami (RSMC), National Hurricane Center", subcenters: &[], process_types: &[] },
    Center { id: 53, text: "Canadian Meteorological Service - Montreal (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 54, text: "Canadian Meteorological Service - Montreal (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 55, text: "San Francisco", subcenters: &[], process_types: &[] },
    Center { id: 56, text: "ARINC Center", subcenters: &[], process_types: &[] },
    Center { id: 57, text: "US Air Force - Air Force Global Weather Center", subcenters: &[], process_types: &[] },
    Center { id: 58, text: "Fleet Numerical Meteorology and Oceanography Center,Monterey,CA,USA", subcenters: &[], process_types: &[] },
    Center { id: 59, text: "The NOAA Forecast Systems Lab, Boulder, CO, USA", subcenters: &[], process_types: &[] },
    Center { id: 60, text: "National Center for Atmospheric Research (NCAR), Boulder, CO", subcenters: &[], process_types: &[] },
    Center { id: 61, text: "Service ARGOS - Landover, MD, USA", subcenters: &[], process_types: &[] },
    Center { id: 62, text: "US Naval Oceanographic Office", subcenters: &[], process_types: &[] },
    Center { id: 63, text: "International Research Institude for Climate and Society", subcenters: &[], process_types: &[] },
    Center { id: 64, text: "Honolulu", subcenters: &[], process_types: &[] },
    Center { id: 65, text: "Darwin (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 66, text: "Darwin (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 67, text: "Melbourne (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 69, text: "Wellington (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 70, text: "Wellington (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 71, text: "Nadi (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 72, text: "Singapore", subcenters: &[], process_types: &[] },
    Center { id: 73, text: "Malaysia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 74, text: "U.K. Met Office - Exeter (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 75, text: "U.K. Met Office - Exeter (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 76, text: "Moscow (RSMC/RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 78, text: "Offenbach (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 79, text: "Offenbach (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 80, text: "Rome (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 81, text: "Rome (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 82, text: "Norrkoping", subcenters: &[], process_types: &[] },
    Center { id: 83, text: "Norrkoping", subcenters: &[], process_types: &[] },
    Center { id: 84, text: "French Weather Service - Toulouse", subcenters: &[], process_types: &[] },
    Center { id: 85, text: "French Weather Service - Toulouse", subcenters: &[], process_types: &[] },
    Center { id: 86, text: "Helsinki", subcenters: &[], process_types: &[] },
    Center { id: 87, text: "Belgrade", subcenters: &[], process_types: &[] },
    Center { id: 88, text: "Oslo", subcenters: &[], process_types: &[] },
    Center { id: 89, text: "Prague", subcenters: &[], process_types: &[] },
    Center { id: 90, text: "Episkopi", subcenters: &[], process_types: &[] },
    Center { id: 91, text: "Ankara", subcenters: &[], process_types: &[] },
    Center { id: 92, text: "Frankfurt/Main (RAFC)", subcenters: &[], process_types: &[] },
    Center { id: 93, text: "London (WAFC)", subcenters: &[], process_types: &[] },
    Center { id: 94, text: "Copenhagen", subcenters: &[], process_types: &[] },
    Center { id: 95, text: "Rota", subcenters: &[], process_types: &[] },
    Center { id: 96, text: "Athens", subcenters: &[], process_types: &[] },
    Center { id: 97, text: "European Space Agency (ESA)", subcenters: &[], process_types: &[] },
    Center { id: 98, text: "European Center for Medium-Range Weather Forecasts (RSMC)", subcenters: &[], process_types: &[] },
    Center { id: 99, text: "De Bilt, Netherlands", subcenters: &[], process_types: &[] },
    Center { id: 100, text: "Brazzaville", subcenters: &[], process_types: &[] },
    Center { id: 101, text: "Abidjan", subcenters: &[], process_types: &[] },
    Center { id: 102, text: "Libyan Arab Jamahiriya (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 103, text: "Madagascar (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 104, text: "Mauritius (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 105, text: "Niger (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 106, text: "Seychelles (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 107, text: "Uganda (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 108, text: "United Republic of Tanzania (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 109, text: "Zimbabwe (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 110, text: "Hong-Kong", subcenters: &[], process_types: &[] },
    Center { id: 111, text: "Afghanistan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 112, text: "Bahrain (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 113, text: "Bangladesh (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 114, text: "Bhutan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 115, text: "Cambodia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 116, text: "Democratic People's Republic of Korea (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 117, text: "Islamic Republic of Iran (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 118, text: "Iraq (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 119, text: "Kazakhstan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 120, text: "Kuwait (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 121, text: "Kyrgyz Republic (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 122, text: "Lao People's Democratic Republic (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 123, text: "Macao, China", subcenters: &[], process_types: &[] },
    Center { id: 124, text: "Maldives (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 125, text: "Myanmar (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 126, text: "Nepal (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 127, text: "Oman (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 128, text: "Pakistan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 129, text: "Qatar (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 130, text: "Yemen (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 131, text: "Sri Lanka (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 132, text: "Tajikistan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 133, text: "Turkmenistan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 134, text: "United Arab Emirates (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 135, text: "Uzbekistan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 136, text: "Viet Nam (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 140, text: "Bolivia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 141, text: "Guyana (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 142, text: "Paraguay (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 143, text: "Suriname (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 144, text: "Uruguay (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 145, text: "French Guyana", subcenters: &[], process_types: &[] },
    Center { id: 146, text: "Brazilian Navy Hydrographic Center", subcenters: &[], process_types: &[] },
    Center { id: 147, text: "National Commission on Space Activities - Argentina", subcenters: &[], process_types: &[] },
    Center { id: 150, text: "Antigua and Barbuda (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 151, text: "Bahamas (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 152, text: "Barbados (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 153, text: "Belize (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 154, text: "British Caribbean Territories Center", subcenters: &[], process_types: &[] },
    Center { id: 155, text: "San Jose", subcenters: &[], process_types: &[] },
    Center { id: 156, text: "Cuba (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 157, text: "Dominica (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 158, text: "Dominican Republic (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 159, text: "El Salvador (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 160, text: "US NOAA/NESDIS", subcenters: &[], process_types: &[] },
    Center { id: 161, text: "US NOAA Office of Oceanic and Atmospheric Research", subcenters: &[], process_types: &[] },
    Center { id: 162, text: "Guatemala (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 163, text: "Haiti (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 164, text: "Honduras (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 165, text: "Jamaica (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 166, text: "Mexico City", subcenters: &[], process_types: &[] },
    Center { id: 167, text: "Netherlands Antilles and Aruba (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 168, text: "Nicaragua (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 169, text: "Panama (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 170, text: "Saint Lucia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 171, text: "Trinidad and Tobago (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 172, text: "French Departments in RA IV", subcenters: &[], process_types: &[] },
    Center { id: 173, text: "US National Aeronautics and Space Administration (NASA)", subcenters: &[], process_types: &[] },
    Center { id: 174, text: "Integrated System Data Management/Marine Environmental Data Service (ISDM/MEDS) - Canada", subcenters: &[], process_types: &[] },
    Center { id: 176, text: "US Cooperative Institude for Meteorological Satellite Studies", subcenters: &[], process_types: &[] },
    Center { id: 190, text: "Cook Islands (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 191, text: "French Polynesia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 192, text: "Tonga (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 193, text: "Vanuatu (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 194, text: "Brunei (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 195, text: "Indonesia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 196, text: "Kiribati (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 197, text: "Federated States of Micronesia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 198, text: "New Caledonia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 199, text: "Niue", subcenters: &[], process_types: &[] },
    Center { id: 200, text: "Papua New Guinea (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 201, text: "Philippines (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 202, text: "Samoa (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 203, text: "Solomon Islands (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 204, text: "National Institude of Water and Atmospheric Research - New Zealand", subcenters: &[], process_types: &[] },
    Center { id: 210, text: "Frascati (ESA/ESRIN)", subcenters: &[], process_types: &[] },
    Center { id: 211, text: "Lanion", subcenters: &[], process_types: &[] },
    Center { id: 212, text: "Lisbon", subcenters: &[], process_types: &[] },
    Center { id: 213, text: "Reykjavik", subcenters: &[], process_types: &[] },
    Center { id: 214, text: "Madrid", subcenters: &[], process_types: &[] },
    Center { id: 215, text: "Zurich", subcenters: &[], process_types: &[] },
    Center { id: 216, text: "Service ARGOS - Toulouse", subcenters: &[], process_types: &[] },
    Center { id: 217, text: "Bratislava", subcenters: &[], process_types: &[] },
    Center { id: 218, text: "Budapest", subcenters: &[], process_types: &[] },
    Center { id: 219, text: "Ljubljana", subcenters: &[], process_types: &[] },
    Center { id: 220, text: "Warsaw", subcenters: &[], process_types: &[] },
    Center { id: 221, text: "Zagreb", subcenters: &[], process_types: &[] },
    Center { id: 222, text: "Albania (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 223, text: "Armenia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 224, text: "Austria (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 225, text: "Azerbaijan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 226, text: "Belarus (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 227, text: "Belgium (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 228, text: "Bosnia and Herzegovina (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 229, text: "Bulgaria (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 230, text: "Cyprus (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 231, text: "Estonia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 232, text: "Georgia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 233, text: "Dublin", subcenters: &[], process_types: &[] },
    Center { id: 234, text: "Israel (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 235, text: "Jordan (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 236, text: "Latvia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 237, text: "Lebanon (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 238, text: "Lithuania (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 239, text: "Luxembourg", subcenters: &[], process_types: &[] },
    Center { id: 240, text: "Malta (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 241, text: "Monaco", subcenters: &[], process_types: &[] },
    Center { id: 242, text: "Romania (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 243, text: "Syrian Arab Republic (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 244, text: "The former Yugoslav Republic of Macedonia (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 245, text: "Ukraine (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 246, text: "Republic of Moldova (NMC)", subcenters: &[], process_types: &[] },
    Center { id: 247, text: "Operational Programme for the Exchange of Weather RAdar Information (OPERA) - EUMETNET", subcenters: &[], process_types: &[] },
    Center { id: 250, text: "COnsortium for Small scale MOdelling (COSMO)", subcenters: &[], process_types: &[] },
    Center { id: 254, text: "EUMETSAT Operations Center", subcenters: &[], process_types: &[] },
    Center { id: 255, text: "Missing Value", subcenters: &[], process_types: &[] },
];

fn idtext_lookup(table: &'static [IdText], id: u8) -> Option<&'static str> {
    table
        .binary_search_by_key(&id, |&(i, _)| i)
        .ok()
        .map(|i| table[i].1)
}

/// Type of generating process (code table 4.3).
pub fn generating_process_str(id: u8) -> Option<&'static str> {
    idtext_lookup(GENERATING_PROCESSES, id)
}

/// Production status of data (code table 1.3).
pub fn production_status_str(id: u8) -> Option<&'static str> {
    idtext_lookup(PRODUCTION_STATUSES, id)
}

/// Type of data (code table 1.4).
pub fn data_type_str(id: u8) -> Option<&'static str> {
    idtext_lookup(DATA_TYPES, id)
}

/// Indicator of unit of time range (code table 4.4).
pub fn time_range_unit_str(id: u8) -> Option<&'static str> {
    idtext_lookup(TIME_RANGE_UNITS, id)
}

fn find_surface(id: u8) -> Option<&'static SurfaceType> {
    SURFACE_TYPES
        .binary_search_by_key(&id, |s| s.id)
        .ok()
        .map(|i| &SURFACE_TYPES[i])
}

/// Fixed-surface type name (code table 4.5).
pub fn surface_type_str(id: u8) -> Option<&'static str> {
    find_surface(id).map(|s| s.text)
}

/// Unit of a fixed-surface value, when the type carries one.
pub fn surface_unit_str(id: u8) -> Option<&'static str> {
    find_surface(id).and_then(|s| s.unit)
}

/// Originating center row (common code table C-1).
pub fn find_center(id: u16) -> Option<&'static Center> {
    CENTERS
        .binary_search_by_key(&id, |c| c.id)
        .ok()
        .map(|i| &CENTERS[i])
}

/// Originating center name.
pub fn center_str(id: u16) -> Option<&'static str> {
    find_center(id).map(|c| c.text)
}

/// Sub-center name; scoped to its parent center.
pub fn subcenter_str(center: u16, subcenter: u16) -> Option<&'static str> {
    find_center(center)?
        .subcenters
        .iter()
        .find(|&&(id, _)| id == subcenter)
        .map(|&(_, text)| text)
}

/// Center-specific generating-process subtype (e.g. the model id in
/// section 4 octet 14 for NCEP products).
pub fn generating_process_type_str(center: u16, process_type: u8) -> Option<&'static str> {
    find_center(center)?
        .process_types
        .iter()
        .find(|&&(id, _)| id == process_type)
        .map(|&(_, text)| text)
}
