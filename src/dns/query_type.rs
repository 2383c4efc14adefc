//! DNS Query Type definitions and conversions

use std::fmt;
use std::str::FromStr;

/// `QueryType` represents the requested Record Type of a query
///
/// The specific type Unknown that an integer parameter in order to retain the
/// id of an unknown query. An integer can be converted to a querytype using
/// the `from_num` function, and back to an integer using the `to_num` method.
/// Mnemonics such as `"MX"` parse through `FromStr`.
#[derive(PartialEq, Eq, Debug, Clone, Hash, Copy)]
pub enum QueryType {
    Unknown(u16),
    A,     // 1
    Ns,    // 2
    Cname, // 5
    Soa,   // 6
    Ptr,   // 12
    Mx,    // 15
    Txt,   // 16
    Aaaa,  // 28
    Srv,   // 33
}

impl QueryType {
    pub fn to_num(&self) -> u16 {
        match *self {
            QueryType::Unknown(x) => x,
            QueryType::A => 1,
            QueryType::Ns => 2,
            QueryType::Cname => 5,
            QueryType::Soa => 6,
            QueryType::Ptr => 12,
            QueryType::Mx => 15,
            QueryType::Txt => 16,
            QueryType::Aaaa => 28,
            QueryType::Srv => 33,
        }
    }

    pub fn from_num(num: u16) -> QueryType {
        match num {
            1 => QueryType::A,
            2 => QueryType::Ns,
            5 => QueryType::Cname,
            6 => QueryType::Soa,
            12 => QueryType::Ptr,
            15 => QueryType::Mx,
            16 => QueryType::Txt,
            28 => QueryType::Aaaa,
            33 => QueryType::Srv,
            _ => QueryType::Unknown(num),
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            QueryType::Unknown(x) => write!(f, "TYPE{}", x),
            QueryType::A => write!(f, "A"),
            QueryType::Ns => write!(f, "NS"),
            QueryType::Cname => write!(f, "CNAME"),
            QueryType::Soa => write!(f, "SOA"),
            QueryType::Ptr => write!(f, "PTR"),
            QueryType::Mx => write!(f, "MX"),
            QueryType::Txt => write!(f, "TXT"),
            QueryType::Aaaa => write!(f, "AAAA"),
            QueryType::Srv => write!(f, "SRV"),
        }
    }
}

impl FromStr for QueryType {
    type Err = String;

    /// Accepts mnemonics case-insensitively, plus `TYPEnn` and bare numbers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let qtype = match upper.as_str() {
            "A" => QueryType::A,
            "NS" => QueryType::Ns,
            "CNAME" => QueryType::Cname,
            "SOA" => QueryType::Soa,
            "PTR" => QueryType::Ptr,
            "MX" => QueryType::Mx,
            "TXT" => QueryType::Txt,
            "AAAA" => QueryType::Aaaa,
            "SRV" => QueryType::Srv,
            other => {
                let digits = other.strip_prefix("TYPE").unwrap_or(other);
                match digits.parse::<u16>() {
                    Ok(num) => QueryType::from_num(num),
                    Err(_) => return Err(format!("Unknown query type: {}", s)),
                }
            }
        };
        Ok(qtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_conversion() {
        assert_eq!(QueryType::from_num(12), QueryType::Ptr);
        assert_eq!(QueryType::Mx.to_num(), 15);
        assert_eq!(QueryType::from_num(999), QueryType::Unknown(999));
        assert_eq!(QueryType::Unknown(999).to_num(), 999);
    }

    #[test]
    fn test_parse_mnemonics() {
        assert_eq!("mx".parse::<QueryType>().unwrap(), QueryType::Mx);
        assert_eq!(" CNAME ".parse::<QueryType>().unwrap(), QueryType::Cname);
        assert_eq!("TYPE12".parse::<QueryType>().unwrap(), QueryType::Ptr);
        assert_eq!("65".parse::<QueryType>().unwrap(), QueryType::Unknown(65));
        assert!("bogus".parse::<QueryType>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryType::Ptr.to_string(), "PTR");
        assert_eq!(QueryType::Unknown(65).to_string(), "TYPE65");
    }
}
