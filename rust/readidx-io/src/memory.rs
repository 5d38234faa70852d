use crate::ByteSource;

impl ByteSource for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Box<[u8]> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for String {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

impl ByteSource for &'static [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for &'static str {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

/// An in-memory source carrying a display name, handy for tests and for text
/// that did not come from a file.
pub struct NamedBuffer {
    name: String,
    data: Vec<u8>,
}

impl NamedBuffer {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> NamedBuffer {
        NamedBuffer {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl ByteSource for NamedBuffer {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn name(&self) -> &str {
        &self.name
    }
}
