//! Go's predeclared types and a few standard-library interfaces whose method
//! sets are needed when they are embedded in indexed interfaces.

/// Predeclared non-interface types.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Predeclared interface types.
pub const BUILTIN_INTERFACES: &[&str] = &["error", "any", "comparable"];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

pub fn is_builtin_interface(name: &str) -> bool {
    BUILTIN_INTERFACES.contains(&name)
}

/// Any predeclared type name.
pub fn is_builtin(name: &str) -> bool {
    is_primitive(name) || is_builtin_interface(name)
}

/// Method set (name, canonical signature) of a predeclared or well-known
/// standard-library interface.
pub fn known_interface_methods(location: &str, name: &str) -> Option<&'static [(&'static str, &'static str)]> {
    let methods: &'static [(&'static str, &'static str)] = match (location, name) {
        ("", "error") => &[("Error", "func() string")],
        ("", "any") | ("", "comparable") => &[],
        ("fmt", "Stringer") => &[("String", "func() string")],
        ("context", "Context") => &[
            ("Deadline", "func() (time.Time, bool)"),
            ("Done", "func() <-chan struct{}"),
            ("Err", "func() error"),
            ("Value", "func(any) any"),
        ],
        ("io", "Reader") => &[("Read", "func([]byte) (int, error)")],
        ("io", "Writer") => &[("Write", "func([]byte) (int, error)")],
        ("io", "Closer") => &[("Close", "func() error")],
        ("io", "ReadCloser") => &[
            ("Read", "func([]byte) (int, error)"),
            ("Close", "func() error"),
        ],
        ("io", "WriteCloser") => &[
            ("Write", "func([]byte) (int, error)"),
            ("Close", "func() error"),
        ],
        ("io", "ReadWriter") => &[
            ("Read", "func([]byte) (int, error)"),
            ("Write", "func([]byte) (int, error)"),
        ],
        ("io", "ReadWriteCloser") => &[
            ("Read", "func([]byte) (int, error)"),
            ("Write", "func([]byte) (int, error)"),
            ("Close", "func() error"),
        ],
        _ => return None,
    };
    Some(methods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_predeclared_types() {
        assert!(is_primitive("string"));
        assert!(!is_primitive("error"));
        assert!(is_builtin_interface("error"));
        assert!(is_builtin("any"));
        assert!(!is_builtin("Service"));
    }

    #[test]
    fn knows_error_and_io_interfaces() {
        assert_eq!(known_interface_methods("", "error").map(<[_]>::len), Some(1));
        assert_eq!(known_interface_methods("io", "ReadCloser").map(<[_]>::len), Some(2));
        assert_eq!(known_interface_methods("context", "Context").map(<[_]>::len), Some(4));
        assert!(known_interface_methods("example.com/x", "Reader").is_none());
    }
}
