use std::borrow::Cow;
use std::fmt;

/// DNS RCODE values (RFC 1035, RFC 2136, RFC 2845, RFC 6891, RFC 7873, RFC 8490).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    YxDomain,
    YxRrset,
    NxRrset,
    NotAuth,
    NotZone,
    DsoTypeNi,
    /// 16 is shared by BADVERS (EDNS) and BADSIG (TSIG).
    BadSig,
    BadKey,
    BadTime,
    BadMode,
    BadName,
    BadAlg,
    BadTrunc,
    BadCookie,
}

impl ResponseCode {
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            0 => Some(ResponseCode::NoError),
            1 => Some(ResponseCode::FormErr),
            2 => Some(ResponseCode::ServFail),
            3 => Some(ResponseCode::NxDomain),
            4 => Some(ResponseCode::NotImp),
            5 => Some(ResponseCode::Refused),
            6 => Some(ResponseCode::YxDomain),
            7 => Some(ResponseCode::YxRrset),
            8 => Some(ResponseCode::NxRrset),
            9 => Some(ResponseCode::NotAuth),
            10 => Some(ResponseCode::NotZone),
            11 => Some(ResponseCode::DsoTypeNi),
            16 => Some(ResponseCode::BadSig),
            17 => Some(ResponseCode::BadKey),
            18 => Some(ResponseCode::BadTime),
            19 => Some(ResponseCode::BadMode),
            20 => Some(ResponseCode::BadName),
            21 => Some(ResponseCode::BadAlg),
            22 => Some(ResponseCode::BadTrunc),
            23 => Some(ResponseCode::BadCookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::YxDomain => "YXDOMAIN",
            ResponseCode::YxRrset => "YXRRSET",
            ResponseCode::NxRrset => "NXRRSET",
            ResponseCode::NotAuth => "NOTAUTH",
            ResponseCode::NotZone => "NOTZONE",
            ResponseCode::DsoTypeNi => "DSOTYPENI",
            ResponseCode::BadSig => "BADSIG",
            ResponseCode::BadKey => "BADKEY",
            ResponseCode::BadTime => "BADTIME",
            ResponseCode::BadMode => "BADMODE",
            ResponseCode::BadName => "BADNAME",
            ResponseCode::BadAlg => "BADALG",
            ResponseCode::BadTrunc => "BADTRUNC",
            ResponseCode::BadCookie => "BADCOOKIE",
        }
    }

    pub fn mnemonic(code: u16) -> Cow<'static, str> {
        match Self::from_u16(code) {
            Some(rcode) => Cow::Borrowed(rcode.as_str()),
            None => Cow::Owned(code.to_string()),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
