//! End-to-end checks of the scanning engine against real sockets and
//! substitute backends.

#[cfg(test)]
mod scanning;
