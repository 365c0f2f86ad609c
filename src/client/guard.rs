//! Connection ownership with release on every exit path

/// Owns an open connection and closes it exactly once
///
/// The connection is closed by [`release`](Self::release) or, failing
/// that, when the guard is dropped, so an early `?` still releases it.
pub struct ConnectionGuard<C> {
    conn: Option<C>,
}

impl<C> ConnectionGuard<C> {
    pub fn new(conn: C) -> Self {
        Self { conn: Some(conn) }
    }

    /// The connection, or `None` once released
    pub fn get(&self) -> Option<&C> {
        self.conn.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection now. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(conn);
            log::info!("Database connection closed.");
        }
    }
}

impl<C> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}
