/// Name reported for ports missing from the catalog.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Maps a well-known port to the service usually listening on it.
pub fn lookup(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        110 => "POP3",
        143 => "IMAP",
        443 => "HTTPS",
        993 => "IMAPS",
        995 => "POP3S",
        3306 => "MySQL",
        3389 => "RDP",
        5432 => "PostgreSQL",
        8080 => "HTTP-Proxy",
        8443 => "HTTPS-Alt",
        _ => UNKNOWN_SERVICE,
    }
}
