use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

pub fn rerun_if_changed<P: AsRef<Path>>(path: P) {
    println!("cargo:rerun-if-changed={}", path.as_ref().display());
}

pub fn rerun_if_env_changed(var: &str) {
    println!("cargo:rerun-if-env-changed={}", var);
}

/// Integer constants collected from vendor-generated C headers
/// (`system.h`, `sequencer_defines.h`, `sequencer_auto.h`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defines {
    values: BTreeMap<String, u32>,
}

impl Defines {
    pub fn new() -> Defines {
        Defines::default()
    }

    pub fn parse(text: &str) -> Defines {
        let mut defines = Defines::new();
        for line in text.lines() {
            let mut words = line.split_whitespace();
            if words.next() != Some("#define") {
                continue
            }
            let (name, value) = match (words.next(), words.next()) {
                (Some(name), Some(value)) => (name, value),
                _ => continue
            };
            // Function-like macros never carry a plain constant.
            if name.contains('(') {
                continue
            }
            if let Some(value) = parse_int(value) {
                defines.values.insert(name.to_owned(), value);
            }
        }
        defines
    }

    /// Parses every file listed in the environment variable `var`
    /// (separated like `PATH`), registering each with cargo.
    pub fn from_env(var: &str) -> Option<Defines> {
        rerun_if_env_changed(var);
        let paths = env::var_os(var)?;
        let mut defines = Defines::new();
        for path in env::split_paths(&paths) {
            rerun_if_changed(&path);
            let text = fs::read_to_string(&path)
                .unwrap_or_else(|err| panic!("cannot read {}: {}", path.display(), err));
            defines.merge(Defines::parse(&text));
        }
        Some(defines)
    }

    pub fn merge(&mut self, other: Defines) {
        self.values.extend(other.values)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.values.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> u32 {
        match self.get(name) {
            Some(value) => value,
            None => panic!("missing #define {}", name)
        }
    }

    /// Like `require`, for constants that are used as divisors.
    pub fn require_nonzero(&self, name: &str) -> u32 {
        match self.require(name) {
            0 => panic!("#define {} must not be zero", name),
            value => value
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_int(text: &str) -> Option<u32> {
    let text = text.trim_start_matches('(').trim_end_matches(')');
    let text = text.trim_end_matches(|c| c == 'u' || c == 'U' || c == 'l' || c == 'L');
    if text.starts_with("0x") || text.starts_with("0X") {
        u32::from_str_radix(&text[2..], 16).ok()
    } else {
        text.parse().ok()
    }
}
