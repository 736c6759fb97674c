use smol_str::SmolStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Turn literal `\n` escape sequences into line breaks before scanning.
    pub unescape_newlines: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unescape_newlines(mut self, unescape_newlines: bool) -> Self {
        self.unescape_newlines = unescape_newlines;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpec {
    pub name: SmolStr,
    pub fields: Vec<SmolStr>,
}

impl ArraySpec {
    pub fn new<I, S>(name: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: SmolStr::new(name),
            fields: fields
                .into_iter()
                .map(|field| SmolStr::new(field.as_ref()))
                .collect(),
        }
    }
}

/// Required entries of a document. Also fixes the canonical output order:
/// required scalars first, then required arrays, each in listed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub required_scalars: Vec<SmolStr>,
    pub required_arrays: Vec<ArraySpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self {
            required_scalars: Vec::new(),
            required_arrays: Vec::new(),
        }
    }

    pub fn meeting_minutes() -> Self {
        Self {
            required_scalars: ["local", "data_horario", "convocado_por", "objetivo"]
                .into_iter()
                .map(SmolStr::new_static)
                .collect(),
            required_arrays: vec![
                ArraySpec::new("participantes", ["num", "nome"]),
                ArraySpec::new("pontos", ["item", "topico"]),
                ArraySpec::new("proximos_passos", ["item", "acao", "responsavel", "data"]),
            ],
        }
    }

    pub fn with_scalar(mut self, name: &str) -> Self {
        self.required_scalars.push(SmolStr::new(name));
        self
    }

    pub fn with_array(mut self, spec: ArraySpec) -> Self {
        self.required_arrays.push(spec);
        self
    }

    pub fn array_spec(&self, name: &str) -> Option<&ArraySpec> {
        self.required_arrays.iter().find(|spec| spec.name.as_str() == name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::meeting_minutes()
    }
}
