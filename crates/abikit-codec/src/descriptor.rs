//! Type descriptors: the static description a type tree is built from

use std::fmt;

use crate::error::AbiError;

/// Kind tag of a type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `uint<N>`
    Uint,
    /// `int<N>`
    Int,
    /// `bool`
    Bool,
    /// `address`
    Address,
    /// `bytes<N>`
    FixedBytes,
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `tuple` / `(T1,T2,...)`
    Tuple,
    /// `T[]` / `T[N]`
    Array,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Uint => "uint",
            TypeKind::Int => "int",
            TypeKind::Bool => "bool",
            TypeKind::Address => "address",
            TypeKind::FixedBytes => "fixed bytes",
            TypeKind::Bytes => "bytes",
            TypeKind::String => "string",
            TypeKind::Tuple => "tuple",
            TypeKind::Array => "array",
        };
        f.write_str(s)
    }
}

/// Static description of one ABI type
///
/// `width` is the bit width for integers, the byte width for fixed bytes and
/// the length for fixed arrays (`None` for dynamic arrays). `components` holds
/// tuple members, or the single element type of an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Kind tag
    pub kind: TypeKind,
    /// Member name, if any
    pub name: Option<String>,
    /// Fixed width or length
    pub width: Option<usize>,
    /// Child descriptors
    pub components: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    fn leaf(kind: TypeKind, width: Option<usize>) -> Self {
        Self { kind, name: None, width, components: Vec::new() }
    }

    /// `uint<bits>`
    pub fn uint(bits: usize) -> Self {
        Self::leaf(TypeKind::Uint, Some(bits))
    }

    /// `int<bits>`
    pub fn int(bits: usize) -> Self {
        Self::leaf(TypeKind::Int, Some(bits))
    }

    /// `bool`
    pub fn bool() -> Self {
        Self::leaf(TypeKind::Bool, None)
    }

    /// `address`
    pub fn address() -> Self {
        Self::leaf(TypeKind::Address, None)
    }

    /// `bytes<size>`
    pub fn fixed_bytes(size: usize) -> Self {
        Self::leaf(TypeKind::FixedBytes, Some(size))
    }

    /// `bytes`
    pub fn bytes() -> Self {
        Self::leaf(TypeKind::Bytes, None)
    }

    /// `string`
    pub fn string() -> Self {
        Self::leaf(TypeKind::String, None)
    }

    /// Tuple of `components`
    pub fn tuple(components: Vec<TypeDescriptor>) -> Self {
        Self { kind: TypeKind::Tuple, name: None, width: None, components }
    }

    /// Dynamic-length array `T[]`
    pub fn array(element: TypeDescriptor) -> Self {
        Self { kind: TypeKind::Array, name: None, width: None, components: vec![element] }
    }

    /// Fixed-length array `T[len]`
    pub fn fixed_array(element: TypeDescriptor, len: usize) -> Self {
        Self { kind: TypeKind::Array, name: None, width: Some(len), components: vec![element] }
    }

    /// Attach a member name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse a type string such as `uint256`, `(address,bytes)[]` or
    /// `uint8[3][]`, optionally followed by a parameter name.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        parse_param(s, Vec::new())
    }

    /// Parse an ABI JSON type string, where the members of `tuple` (and
    /// `tuple[..]`) are supplied separately.
    pub fn parse_with_components(
        s: &str,
        components: Vec<TypeDescriptor>,
    ) -> Result<Self, AbiError> {
        parse_param(s, components)
    }
}

/// Static description of a contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Parameters
    pub inputs: Vec<TypeDescriptor>,
    /// Return values
    pub outputs: Vec<TypeDescriptor>,
}

impl MethodDescriptor {
    /// Create a new method descriptor
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<TypeDescriptor>,
        outputs: Vec<TypeDescriptor>,
    ) -> Self {
        Self { name: name.into(), inputs, outputs }
    }

    /// Parse `name(inputs)` or `name(inputs)(outputs)`.
    ///
    /// Parameter names are allowed, e.g. `transfer(address to, uint256 amount)`.
    pub fn parse_signature(s: &str) -> Result<Self, AbiError> {
        let s = s.trim();
        let open = s
            .find('(')
            .ok_or_else(|| AbiError::descriptor(format!("missing parameter list in {:?}", s)))?;
        let name = s[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(AbiError::descriptor(format!("invalid method name {:?}", name)));
        }

        let close = matching_paren(s, open)?;
        let inputs = parse_list(&s[open + 1..close])?;

        let rest = s[close + 1..].trim();
        let rest = rest.strip_prefix("returns").map(str::trim).unwrap_or(rest);
        let outputs = if rest.is_empty() {
            Vec::new()
        } else {
            if !rest.starts_with('(') {
                return Err(AbiError::descriptor(format!("unexpected trailing input {:?}", rest)));
            }
            let end = matching_paren(rest, 0)?;
            if !rest[end + 1..].trim().is_empty() {
                return Err(AbiError::descriptor(format!("unexpected trailing input {:?}", rest)));
            }
            parse_list(&rest[1..end])?
        };

        Ok(Self { name: name.to_string(), inputs, outputs })
    }
}

/// Keywords that may follow a type in a human-readable parameter
const LOCATION_KEYWORDS: &[&str] = &["memory", "calldata", "storage", "indexed", "payable"];

fn matching_paren(s: &str, open: usize) -> Result<usize, AbiError> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(AbiError::descriptor(format!("unbalanced parentheses in {:?}", s)))
}

/// Split on commas that are not nested inside parentheses
fn split_top_level(s: &str) -> Result<Vec<&str>, AbiError> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(AbiError::descriptor(format!("unbalanced parentheses in {:?}", s)));
        }
    }
    if depth != 0 {
        return Err(AbiError::descriptor(format!("unbalanced parentheses in {:?}", s)));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

fn parse_list(s: &str) -> Result<Vec<TypeDescriptor>, AbiError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(s)?
        .into_iter()
        .enumerate()
        .map(|(i, part)| parse_param(part, Vec::new()).map_err(|e| e.within(&i.to_string())))
        .collect()
}

/// Parse `type [keywords] [name]`
fn parse_param(s: &str, components: Vec<TypeDescriptor>) -> Result<TypeDescriptor, AbiError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AbiError::descriptor("empty type"));
    }

    let type_end = if s.starts_with('(') {
        let close = matching_paren(s, 0)?;
        s[close..].find(char::is_whitespace).map(|i| close + i).unwrap_or(s.len())
    } else {
        s.find(char::is_whitespace).unwrap_or(s.len())
    };

    let mut descriptor = parse_type(&s[..type_end], components)?;
    let name = s[type_end..]
        .split_whitespace()
        .filter(|word| !LOCATION_KEYWORDS.contains(word))
        .last();
    if let Some(name) = name {
        descriptor.name = Some(name.to_string());
    }
    Ok(descriptor)
}

fn parse_type(s: &str, components: Vec<TypeDescriptor>) -> Result<TypeDescriptor, AbiError> {
    let mut base = s;
    let mut suffixes = Vec::new();
    while let Some(stripped) = base.strip_suffix(']') {
        let open = stripped
            .rfind('[')
            .ok_or_else(|| AbiError::descriptor(format!("unbalanced brackets in {:?}", s)))?;
        let len = &stripped[open + 1..];
        let len = if len.is_empty() {
            None
        } else {
            Some(len.parse::<usize>().map_err(|_| {
                AbiError::descriptor(format!("invalid array length {:?} in {:?}", len, s))
            })?)
        };
        suffixes.push(len);
        base = &stripped[..open];
    }

    let mut descriptor = parse_base(base, components)?;
    for len in suffixes.into_iter().rev() {
        descriptor = match len {
            Some(len) => TypeDescriptor::fixed_array(descriptor, len),
            None => TypeDescriptor::array(descriptor),
        };
    }
    Ok(descriptor)
}

fn parse_base(s: &str, components: Vec<TypeDescriptor>) -> Result<TypeDescriptor, AbiError> {
    if s.starts_with('(') {
        let close = matching_paren(s, 0)?;
        if close != s.len() - 1 {
            return Err(AbiError::descriptor(format!("unexpected input after tuple in {:?}", s)));
        }
        return Ok(TypeDescriptor::tuple(parse_list(&s[1..close])?));
    }

    match s {
        "address" => return Ok(TypeDescriptor::address()),
        "bool" => return Ok(TypeDescriptor::bool()),
        "string" => return Ok(TypeDescriptor::string()),
        "bytes" => return Ok(TypeDescriptor::bytes()),
        "tuple" => return Ok(TypeDescriptor::tuple(components)),
        "uint" => return Ok(TypeDescriptor::uint(256)),
        "int" => return Ok(TypeDescriptor::int(256)),
        _ => {}
    }

    let width = |digits: &str| -> Result<usize, AbiError> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AbiError::descriptor(format!("unknown type {:?}", s)));
        }
        digits
            .parse::<usize>()
            .map_err(|_| AbiError::descriptor(format!("invalid width in {:?}", s)))
    };

    if let Some(rest) = s.strip_prefix("uint") {
        return Ok(TypeDescriptor::uint(width(rest)?));
    }
    if let Some(rest) = s.strip_prefix("int") {
        return Ok(TypeDescriptor::int(width(rest)?));
    }
    if let Some(rest) = s.strip_prefix("bytes") {
        return Ok(TypeDescriptor::fixed_bytes(width(rest)?));
    }

    Err(AbiError::descriptor(format!("unknown type {:?}", s)))
}
