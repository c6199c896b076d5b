use crate::authoring::*;
use std::collections::BTreeSet;

/// The parameters of an operator, type checked against its gamut, and
/// stored by type for fast run time access
#[derive(Debug, Clone)]
pub struct ParsedParameters {
    pub name: String,

    // Commonly used options have hard-coded slots
    pub ellps: [Ellipsoid; 2],
    pub lat: [f64; 4],
    pub lon: [f64; 4],
    pub x: [f64; 4],
    pub y: [f64; 4],
    pub k: [f64; 4],

    // Op-specific options are stored in B-Trees
    pub boolean: BTreeSet<&'static str>,
    pub natural: BTreeMap<&'static str, usize>,
    pub integer: BTreeMap<&'static str, i64>,
    pub real: BTreeMap<&'static str, f64>,
    pub series: BTreeMap<&'static str, Vec<f64>>,
    pub text: BTreeMap<&'static str, String>,
    pub ignored: Vec<String>,
    pub given: BTreeMap<String, String>,
}

// Accessors
impl ParsedParameters {
    pub fn boolean(&self, key: &str) -> bool {
        self.boolean.contains(key)
    }
    pub fn natural(&self, key: &str) -> Result<usize, Error> {
        if let Some(value) = self.natural.get(key) {
            return Ok(*value);
        }
        Err(Error::MissingParam(key.to_string()))
    }
    pub fn integer(&self, key: &str) -> Result<i64, Error> {
        if let Some(value) = self.integer.get(key) {
            return Ok(*value);
        }
        Err(Error::MissingParam(key.to_string()))
    }
    pub fn real(&self, key: &str) -> Result<f64, Error> {
        if let Some(value) = self.real.get(key) {
            return Ok(*value);
        }
        Err(Error::MissingParam(key.to_string()))
    }
    pub fn series(&self, key: &str) -> Result<&[f64], Error> {
        if let Some(value) = self.series.get(key) {
            return Ok(value);
        }
        Err(Error::MissingParam(key.to_string()))
    }
    pub fn text(&self, key: &str) -> Result<String, Error> {
        if let Some(value) = self.text.get(key) {
            return Ok(value.to_string());
        }
        Err(Error::MissingParam(key.to_string()))
    }
    pub fn ignored(&self) -> Vec<String> {
        self.ignored.clone()
    }
    pub fn ellps(&self, index: usize) -> &Ellipsoid {
        &self.ellps[index]
    }
    pub fn x(&self, index: usize) -> f64 {
        self.x[index]
    }
    pub fn y(&self, index: usize) -> f64 {
        self.y[index]
    }
    pub fn lat(&self, index: usize) -> f64 {
        self.lat[index]
    }
    pub fn lon(&self, index: usize) -> f64 {
        self.lon[index]
    }
    pub fn k(&self, index: usize) -> f64 {
        self.k[index]
    }
}

fn parse_series(key: &str, value: &str) -> Result<Vec<f64>, Error> {
    let mut elements = Vec::<f64>::new();
    for element in value.split(',') {
        if let Ok(v) = element.trim().parse::<f64>() {
            elements.push(v);
            continue;
        }
        warn!("Cannot parse {key}:{value} as a series");
        return Err(Error::BadParam(key.to_string(), value.to_string()));
    }
    Ok(elements)
}

impl ParsedParameters {
    pub fn new(
        parameters: &RawParameters,
        gamut: &[OpParameter],
    ) -> Result<ParsedParameters, Error> {
        let locals = parameters.definition.split_into_parameters();
        let globals = &parameters.globals;
        let mut boolean = BTreeSet::<&'static str>::new();
        let mut natural = BTreeMap::<&'static str, usize>::new();
        let mut integer = BTreeMap::<&'static str, i64>::new();
        let mut real = BTreeMap::<&'static str, f64>::new();
        let mut series = BTreeMap::<&'static str, Vec<f64>>::new();
        let mut text = BTreeMap::<&'static str, String>::new();

        // Try to locate all accepted parameters, type check, and place them into
        // their proper bins
        for p in gamut {
            match *p {
                OpParameter::Flag { key } => {
                    // Flags are local: an inherited 'inv' would invert every
                    // step of a macro body
                    if let Some(value) = locals.get(key) {
                        if value.is_empty() || value.to_lowercase() == "true" {
                            boolean.insert(key);
                            continue;
                        }
                        warn!("Cannot parse {key}:{value} as a boolean constant!");
                        return Err(Error::BadParam(key.to_string(), value.to_string()));
                    }
                    // If we're here, the key was not found, and we're done, since
                    // flags are always optional (i.e. implicitly false when not given)
                    continue;
                }

                OpParameter::Natural { key, default } => {
                    if let Some(value) = chase(globals, &locals, key)? {
                        if let Ok(v) = value.parse::<usize>() {
                            natural.insert(key, v);
                            continue;
                        }
                        warn!("Cannot parse {key}:{value} as a natural number!");
                        return Err(Error::BadParam(key.to_string(), value));
                    }

                    // Key not found - default given?
                    if let Some(value) = default {
                        natural.insert(key, value);
                        continue;
                    }

                    error!("Missing required parameter '{key}'");
                    return Err(Error::MissingParam(key.to_string()));
                }

                OpParameter::Integer { key, default } => {
                    if let Some(value) = chase(globals, &locals, key)? {
                        if let Ok(v) = value.parse::<i64>() {
                            integer.insert(key, v);
                            continue;
                        }
                        warn!("Cannot parse {key}:{value} as an integer!");
                        return Err(Error::BadParam(key.to_string(), value));
                    }

                    if let Some(value) = default {
                        integer.insert(key, value);
                        continue;
                    }

                    error!("Missing required parameter '{key}'");
                    return Err(Error::MissingParam(key.to_string()));
                }

                OpParameter::Real { key, default } => {
                    if let Some(value) = chase(globals, &locals, key)? {
                        if let Ok(v) = value.parse::<f64>() {
                            real.insert(key, v);
                            continue;
                        }
                        warn!("Cannot parse {key}:{value} as a real number");
                        return Err(Error::BadParam(key.to_string(), value));
                    }

                    if let Some(value) = default {
                        real.insert(key, value);
                        continue;
                    }

                    error!("Missing required parameter '{key}'");
                    return Err(Error::MissingParam(key.to_string()));
                }

                OpParameter::Series { key, default } => {
                    if let Some(value) = chase(globals, &locals, key)? {
                        series.insert(key, parse_series(key, &value)?);
                        continue;
                    }

                    if let Some(value) = default {
                        // Defaults to nothing, so we just continue with the next parameter
                        if value.is_empty() {
                            continue;
                        }
                        series.insert(key, parse_series(key, value)?);
                        continue;
                    }

                    error!("Missing required parameter '{key}'");
                    return Err(Error::MissingParam(key.to_string()));
                }

                OpParameter::Text { key, default } => {
                    if let Some(value) = chase(globals, &locals, key)? {
                        text.insert(key, value);
                        continue;
                    }

                    if let Some(value) = default {
                        text.insert(key, value.to_string());
                        continue;
                    }

                    error!("Missing required parameter '{key}'");
                    return Err(Error::MissingParam(key.to_string()));
                }
            };
        }

        // Now handle the commonly used options with the hard-coded slots

        let mut ellps = [Ellipsoid::default(), Ellipsoid::default()];
        let mut lat = [0.; 4];
        let mut lon = [0.; 4];
        let mut x = [0.; 4];
        let mut y = [0.; 4];
        let mut k = [0.; 4];

        // ellps_{n}
        for (i, e) in ellps.iter_mut().enumerate() {
            let key = format!("ellps_{i}");
            if let Some(name) = text.get(&key[..]) {
                *e = Ellipsoid::named(name)?;
            }
        }
        // But `ellps` trumps `ellps_0`
        if let Some(name) = text.get("ellps") {
            ellps[0] = Ellipsoid::named(name)?;
        }

        for i in 0..4 {
            let value = |prefix: &str| real.get(&format!("{prefix}_{i}")[..]).copied();
            lat[i] = value("lat").unwrap_or(0.).to_radians();
            lon[i] = value("lon").unwrap_or(0.).to_radians();
            x[i] = value("x").unwrap_or(0.);
            y[i] = value("y").unwrap_or(0.);
            k[i] = value("k").unwrap_or(0.);
        }

        let name = locals
            .get("name")
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        // Params specified, but not in the gamut
        let given = locals.clone();
        let ignored: Vec<String> = locals
            .into_keys()
            .filter(|key| key != "name" && !gamut.iter().any(|p| p.key() == key))
            .collect();
        if !ignored.is_empty() {
            debug!("{name}: ignoring parameters {ignored:?}");
        }

        Ok(ParsedParameters {
            name,
            ellps,
            lat,
            lon,
            x,
            y,
            k,
            boolean,
            natural,
            integer,
            real,
            series,
            text,
            ignored,
            given,
        })
    }
}

// ----- A N C I L L A R Y   F U N C T I O N S -----------------------------------------

/// Look up `key` among `locals` and `globals` (in that order), recursively
/// chasing look-ups (`^other_key`) and handling defaults (`*value`)
pub fn chase(
    globals: &BTreeMap<String, String>,
    locals: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<String>, Error> {
    // The haystack is a reverse iterator over both lists in series
    let mut haystack = globals.iter().chain(locals.iter()).rev();

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Syntax(String::from("Empty key")));
    }

    let mut default = "";
    let mut needle = key;
    let mut chasing = false;

    loop {
        let Some((_, found)) = haystack.find(|&x| x.0 == needle) else {
            if !default.is_empty() {
                return Ok(Some(String::from(default)));
            }
            if chasing {
                return Err(Error::Syntax(format!(
                    "Incomplete definition for '{key}'"
                )));
            }
            return Ok(None);
        };
        let value = found.trim();

        // If the value is a(nother) lookup, we continue the search in the same iterator,
        // now using a *new search key*, as specified by the current value
        if let Some(stripped) = value.strip_prefix('^') {
            chasing = true;
            needle = stripped;
            continue;
        }

        // If the value is a provided default, we continue the search using the *same key*,
        // in case a proper value is provided.
        // cf. the test `macro_expansion_with_defaults_provided()` in `./mod.rs`
        if let Some(stripped) = value.strip_prefix('*') {
            chasing = true;
            needle = key;
            default = stripped;
            continue;
        }

        return Ok(Some(String::from(value)));
    }
}

// ----- T E S T S ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const GAMUT: [OpParameter; 7] = [
        OpParameter::Flag    { key: "flag" },
        OpParameter::Natural { key: "natural",  default: Some(0) },
        OpParameter::Integer { key: "integer",  default: Some(-1)},
        OpParameter::Real    { key: "real",     default: Some(1.25) },
        OpParameter::Series  { key: "series",   default: Some("1,2,3,4") },
        OpParameter::Text    { key: "text",     default: Some("text") },
        OpParameter::Text    { key: "ellps_0",  default: Some("6400000, 300") },
    ];

    #[test]
    fn basic() -> Result<(), Error> {
        let invocation = String::from("cucumber flag ellps_0=123 , 456 zucchini=7");
        let globals = BTreeMap::<String, String>::new();
        let raw = RawParameters::new(&invocation, &globals);
        let p = ParsedParameters::new(&raw, &GAMUT)?;

        assert!(p.boolean("flag"));
        assert!(!p.boolean("galf"));

        let series = p.series("series")?;
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], 1.);
        assert_eq!(series[3], 4.);

        assert_eq!(p.natural("natural")?, 0_usize);
        assert_eq!(p.integer("integer")?, -1);
        assert_eq!(p.text("text")?, "text");
        assert_eq!(p.name, "cucumber");
        assert_eq!(p.ignored(), ["zucchini"]);

        assert_eq!(p.ellps[0].semimajor_axis(), 123.);
        assert_eq!(p.ellps[0].flattening(), 1. / 456.);

        // Missing required parameters are reported as such
        let gamut = [OpParameter::Real { key: "required", default: None }];
        assert!(matches!(
            ParsedParameters::new(&raw, &gamut),
            Err(Error::MissingParam(_))
        ));

        // ...and malformed values as malformed
        let raw = RawParameters::new("cucumber natural=-3", &globals);
        assert!(matches!(
            ParsedParameters::new(&raw, &GAMUT),
            Err(Error::BadParam(_, _))
        ));
        Ok(())
    }

    #[test]
    fn chasing() -> Result<(), Error> {
        let globals = BTreeMap::from([("ellps".to_string(), "GRS80".to_string())]);
        let locals = BTreeMap::from([
            ("ellps_0".to_string(), "^ellps".to_string()),
            ("x".to_string(), "*3".to_string()),
        ]);
        assert_eq!(chase(&globals, &locals, "ellps_0")?, Some("GRS80".to_string()));
        assert_eq!(chase(&globals, &locals, "x")?, Some("3".to_string()));
        assert_eq!(chase(&globals, &locals, "y")?, None);
        assert!(chase(&globals, &locals, " ").is_err());
        Ok(())
    }
}
