use tokio::io::{AsyncRead, AsyncReadExt};

/// Growable read buffer used while a request is being assembled.
///
/// Bytes `[..filled]` are valid and not yet consumed by the parser. When the
/// valid region reaches the end of the allocation the capacity doubles.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: Vec<u8>,
    filled: usize,
}

impl ReadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)],
            filled: 0,
        }
    }

    /// The bytes read so far and not yet consumed.
    pub fn unconsumed(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// Doubles the capacity, keeping the unconsumed bytes in place.
    pub fn grow(&mut self) {
        let new_len = self.buf.len() * 2;
        self.buf.resize(new_len, 0);
    }

    /// Drops `n` bytes from the front, shifting the remainder down.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.filled);
        self.buf.copy_within(n..self.filled, 0);
        self.filled -= n;
    }

    /// Performs a single read into the free space, growing first if full.
    ///
    /// Returns the number of bytes read; `0` means end of input.
    pub async fn read_from<R>(&mut self, reader: &mut R) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        if self.is_full() {
            self.grow();
        }

        let n = reader.read(&mut self.buf[self.filled..]).await?;
        self.filled += n;
        Ok(n)
    }
}
