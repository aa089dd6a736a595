use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} code '{code}'")]
pub struct UnknownCode {
    kind: &'static str,
    code: String,
}

impl UnknownCode {
    fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Party {
    Republican,
    Democrat,
}

impl Party {
    pub const ALL: [Party; 2] = [Party::Republican, Party::Democrat];

    /// Short code used in listings and in the cache file.
    pub fn code(self) -> &'static str {
        match self {
            Party::Republican => "R",
            Party::Democrat => "D",
        }
    }
}

impl FromStr for Party {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|party| party.code() == s)
            .ok_or_else(|| UnknownCode::new("party", s))
    }
}

impl TryFrom<String> for Party {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Party> for &'static str {
    fn from(party: Party) -> Self {
        party.code()
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Party::Republican => write!(f, "Republican"),
            Party::Democrat => write!(f, "Democrat"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::Senate, Chamber::House];

    pub fn code(self) -> &'static str {
        match self {
            Chamber::House => "House",
            Chamber::Senate => "Senate",
        }
    }

    /// Path segment used by legislature.idaho.gov for this chamber.
    pub fn slug(self) -> &'static str {
        match self {
            Chamber::House => "house",
            Chamber::Senate => "senate",
        }
    }
}

impl FromStr for Chamber {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chamber| chamber.code() == s)
            .ok_or_else(|| UnknownCode::new("chamber", s))
    }
}

impl TryFrom<String> for Chamber {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Chamber> for &'static str {
    fn from(chamber: Chamber) -> Self {
        chamber.code()
    }
}

impl Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum HouseSeat {
    A,
    B,
}

impl HouseSeat {
    pub const ALL: [HouseSeat; 2] = [HouseSeat::A, HouseSeat::B];

    pub fn code(self) -> &'static str {
        match self {
            HouseSeat::A => "A",
            HouseSeat::B => "B",
        }
    }
}

impl FromStr for HouseSeat {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|seat| seat.code() == s)
            .ok_or_else(|| UnknownCode::new("house seat", s))
    }
}

impl TryFrom<String> for HouseSeat {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HouseSeat> for &'static str {
    fn from(seat: HouseSeat) -> Self {
        seat.code()
    }
}

impl Display for HouseSeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Contact details for a legislator. An empty `email` means none was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub home_phone: Option<String>,
    pub business_phone: Option<String>,
    pub statehouse_phone: Option<String>,
    pub mailing_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legislator {
    pub name: String,
    pub party: Party,
    pub district: u32,
    pub chamber: Chamber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_seat: Option<HouseSeat>,
    pub contact: Contact,
    pub occupation: Option<String>,
    pub term_number: Option<u32>,
    pub bio: Option<String>,
    #[serde(default)]
    pub committees: Vec<String>,
}

impl Display for Legislator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) — {} District {}",
            self.name,
            self.party.code(),
            self.chamber,
            self.district
        )?;
        if let Some(seat) = self.house_seat {
            write!(f, ", Seat {}", seat)?;
        }
        if !self.contact.email.is_empty() {
            write!(f, " <{}>", self.contact.email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub name: String,
    pub chamber: Chamber,
    pub chair: Option<String>,
    pub vice_chair: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Display for Committee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.name, self.chamber)?;
        if let Some(chair) = &self.chair {
            writeln!(f, "  Chair: {}", chair)?;
        }
        if let Some(vice_chair) = &self.vice_chair {
            writeln!(f, "  Vice chair: {}", vice_chair)?;
        }
        if !self.members.is_empty() {
            writeln!(f, "  Members: {}", self.members.join(", "))?;
        }
        Ok(())
    }
}

/// Everything one full fetch produces. Senators are always `Chamber::Senate`
/// and representatives always `Chamber::House`; duplicates are kept as scraped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub senators: Vec<Legislator>,
    pub representatives: Vec<Legislator>,
    pub committees: Vec<Committee>,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.senators.is_empty() && self.representatives.is_empty() && self.committees.is_empty()
    }

    /// Senators followed by representatives, in scrape order.
    pub fn legislators(&self) -> impl Iterator<Item = &Legislator> {
        self.senators.iter().chain(self.representatives.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senator() -> Legislator {
        Legislator {
            name: "Mary Souza".to_string(),
            party: Party::Republican,
            district: 1,
            chamber: Chamber::Senate,
            house_seat: None,
            contact: Contact {
                email: "msouza@senate.idaho.gov".to_string(),
                statehouse_phone: Some("(208) 332-1000".to_string()),
                ..Default::default()
            },
            occupation: Some("Retired Educator".to_string()),
            term_number: None,
            bio: None,
            committees: vec![],
        }
    }

    #[test]
    fn test_wire_codes_parse_back() {
        for party in Party::ALL {
            assert_eq!(party.code().parse::<Party>().unwrap(), party);
        }
        for chamber in Chamber::ALL {
            assert_eq!(chamber.code().parse::<Chamber>().unwrap(), chamber);
        }
        for seat in HouseSeat::ALL {
            assert_eq!(seat.code().parse::<HouseSeat>().unwrap(), seat);
        }
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        let err = "I".parse::<Party>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown party code 'I'");
        assert!("senate".parse::<Chamber>().is_err());
        assert!("C".parse::<HouseSeat>().is_err());
    }

    #[test]
    fn test_legislator_json_uses_wire_codes() {
        let json = serde_json::to_value(senator()).unwrap();

        assert_eq!(json["party"], "R");
        assert_eq!(json["chamber"], "Senate");
        assert!(json.get("houseSeat").is_none(), "Senators carry no seat");
        assert_eq!(json["contact"]["statehousePhone"], "(208) 332-1000");
        assert!(json["contact"]["homePhone"].is_null());
        assert_eq!(json["committees"], serde_json::json!([]));
    }

    #[test]
    fn test_legislator_rejects_unknown_party_code() {
        let mut json = serde_json::to_value(senator()).unwrap();
        json["party"] = serde_json::json!("Independent");

        let err = serde_json::from_value::<Legislator>(json).unwrap_err();
        assert!(err.to_string().contains("Unknown party code"));
    }

    #[test]
    fn test_legislator_display() {
        let mut rep = senator();
        rep.chamber = Chamber::House;
        rep.house_seat = Some(HouseSeat::B);

        assert_eq!(
            rep.to_string(),
            "Mary Souza (R) — House District 1, Seat B <msouza@senate.idaho.gov>"
        );
    }
}
