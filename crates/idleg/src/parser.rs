use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Chamber, Contact, HouseSeat, Legislator, Party};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid district: {0}")]
    InvalidDistrict(String),
}

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").expect("invalid regex: name"));

static RE_DISTRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"District\s+(\d+)").expect("invalid regex: district"));

static RE_SEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Seat\s+([AB])\b").expect("invalid regex: seat"));

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("invalid regex: email")
});

static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{3}\) \d{3}-\d{4}").expect("invalid regex: phone"));

static RE_OCCUPATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Occupation:\s*([^,\n]+)").expect("invalid regex: occupation")
});

static SEL_MEMBER_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.member-card").expect("invalid selector: member card"));

static SEL_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("invalid selector: row"));

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element, one line per non-blank text node.
fn flatten_text(element: ElementRef) -> String {
    element
        .text()
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

fn parse_district(text: &str) -> Result<u32, ParseError> {
    let caps = RE_DISTRICT
        .captures(text)
        .ok_or(ParseError::MissingField("district"))?;
    match caps[1].parse::<u32>() {
        Ok(0) | Err(_) => Err(ParseError::InvalidDistrict(caps[1].to_string())),
        Ok(district) => Ok(district),
    }
}

fn parse_seat(text: &str) -> Option<HouseSeat> {
    RE_SEAT
        .captures(text)
        .and_then(|caps| caps[1].parse::<HouseSeat>().ok())
}

fn parse_occupation(text: &str) -> Option<String> {
    RE_OCCUPATION
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

fn try_parse_member(text: &str, chamber: Chamber) -> Result<Legislator, ParseError> {
    let name = first_match(&RE_NAME, text).ok_or(ParseError::MissingField("name"))?;

    let party = if text.contains("(R)") {
        Party::Republican
    } else {
        Party::Democrat
    };

    let district = parse_district(text)?;

    let house_seat = match chamber {
        Chamber::House => parse_seat(text),
        Chamber::Senate => None,
    };

    let email = first_match(&RE_EMAIL, text).unwrap_or_default();

    let mut phones = RE_PHONE.find_iter(text).map(|m| m.as_str().to_string());
    let home_phone = phones.next();
    let statehouse_phone = phones.next();

    Ok(Legislator {
        name,
        party,
        district,
        chamber,
        house_seat,
        contact: Contact {
            email,
            home_phone,
            statehouse_phone,
            ..Default::default()
        },
        occupation: parse_occupation(text),
        term_number: None,
        bio: None,
        committees: Vec::new(),
    })
}

/// Builds a legislator from the flattened text of one listing entry.
///
/// Only the name and district are mandatory; every other field degrades to
/// its empty value. A party marker other than `(R)` is read as Democrat.
pub fn parse_member_text(text: &str, chamber: Chamber) -> Option<Legislator> {
    match try_parse_member(text, chamber) {
        Ok(legislator) => Some(legislator),
        Err(ParseError::MissingField(field)) => {
            log::debug!("Skipping {} fragment without {}", chamber.slug(), field);
            None
        }
        Err(e) => {
            log::warn!("Error parsing {} member data: {}", chamber.slug(), e);
            None
        }
    }
}

pub fn parse_member(element: ElementRef, chamber: Chamber) -> Option<Legislator> {
    parse_member_text(&flatten_text(element), chamber)
}

/// Parses every member entry on a chamber membership page, in document order.
/// Member cards are preferred; table rows are only used when the page has none.
pub fn parse_member_list(html: &str, chamber: Chamber) -> Vec<Legislator> {
    let document = Html::parse_document(html);

    let mut fragments: Vec<ElementRef> = document.select(&SEL_MEMBER_CARD).collect();
    if fragments.is_empty() {
        log::debug!("No member cards found, falling back to table rows");
        fragments = document.select(&SEL_ROW).collect();
    }

    fragments
        .into_iter()
        .filter_map(|fragment| parse_member(fragment, chamber))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_member_text_full_house_entry() {
        let text = "Jane Doe (R) District 12 Seat A jane.doe@example.gov (208) 111-2222 Occupation: Farmer";

        let member = parse_member_text(text, Chamber::House).expect("Should parse member");

        assert_eq!(member.name, "Jane Doe");
        assert_eq!(member.party, Party::Republican);
        assert_eq!(member.district, 12);
        assert_eq!(member.chamber, Chamber::House);
        assert_eq!(member.house_seat, Some(HouseSeat::A));
        assert_eq!(member.contact.email, "jane.doe@example.gov");
        assert_eq!(member.contact.home_phone.as_deref(), Some("(208) 111-2222"));
        assert_eq!(member.contact.statehouse_phone, None);
        assert_eq!(member.contact.business_phone, None);
        assert_eq!(member.contact.mailing_address, None);
        assert_eq!(member.occupation.as_deref(), Some("Farmer"));
        assert!(member.committees.is_empty());
        assert_eq!(member.bio, None);
        assert_eq!(member.term_number, None);
    }

    #[test]
    fn test_parse_member_text_requires_name() {
        let cases = [
            "(R) District 4 Seat B someone@example.gov (208) 555-0001",
            "JOHN SMITH (R) District 4",
            "john smith District 4",
            "",
        ];
        for text in cases {
            assert!(
                parse_member_text(text, Chamber::House).is_none(),
                "'{}' has no name and should not parse",
                text
            );
        }
    }

    #[test]
    fn test_parse_member_text_requires_district() {
        assert!(parse_member_text("Jane Doe (R) Seat A", Chamber::House).is_none());
        assert!(parse_member_text("Jane Doe (D) Dist. 4", Chamber::Senate).is_none());
    }

    #[test]
    fn test_parse_member_text_rejects_unrepresentable_district() {
        assert!(parse_member_text("Jane Doe District 0", Chamber::Senate).is_none());
        assert!(parse_member_text("Jane Doe District 99999999999", Chamber::Senate).is_none());
    }

    #[test]
    fn test_parse_member_text_party_marker() {
        let republican = parse_member_text("Jim Woodward District 2 (R)", Chamber::Senate).unwrap();
        assert_eq!(republican.party, Party::Republican);

        for text in [
            "Jim Woodward (D) District 2",
            "Jim Woodward (I) District 2",
            "Jim Woodward District 2",
            "Jim Woodward R District 2",
        ] {
            let member = parse_member_text(text, Chamber::Senate).unwrap();
            assert_eq!(member.party, Party::Democrat, "'{}' has no (R) marker", text);
        }
    }

    #[test]
    fn test_parse_member_text_phone_order() {
        let text = "Carl Crabtree District 7 (208) 555-0001 (208) 555-0002 (208) 555-0003";

        let member = parse_member_text(text, Chamber::Senate).unwrap();

        assert_eq!(member.contact.home_phone.as_deref(), Some("(208) 555-0001"));
        assert_eq!(
            member.contact.statehouse_phone.as_deref(),
            Some("(208) 555-0002")
        );
        assert_eq!(member.contact.business_phone, None);
    }

    #[test]
    fn test_parse_member_text_senate_has_no_seat() {
        let member = parse_member_text("Mary Souza (R) District 1 Seat A", Chamber::Senate).unwrap();
        assert_eq!(member.house_seat, None);

        let member = parse_member_text("Mary Souza (R) District 1 Seat B", Chamber::House).unwrap();
        assert_eq!(member.house_seat, Some(HouseSeat::B));
    }

    #[test]
    fn test_parse_member_text_missing_optionals() {
        let member = parse_member_text("Abby Lee District 9", Chamber::House).unwrap();

        assert_eq!(member.house_seat, None);
        assert_eq!(member.contact.email, "");
        assert_eq!(member.contact.home_phone, None);
        assert_eq!(member.contact.statehouse_phone, None);
        assert_eq!(member.occupation, None);
    }

    #[test]
    fn test_parse_member_text_occupation_stops_at_comma_or_line() {
        let member =
            parse_member_text("Ben Toews District 4 Occupation: Engineer, Retired", Chamber::Senate)
                .unwrap();
        assert_eq!(member.occupation.as_deref(), Some("Engineer"));

        let member =
            parse_member_text("Ben Toews\nDistrict 4\nOccupation:\nEngineer\nBoise", Chamber::Senate)
                .unwrap();
        assert_eq!(member.occupation.as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_parse_member_list_member_cards() {
        let html = fs::read_to_string("fixtures/senate_membership.html")
            .expect("Failed to read fixture");

        let senators = parse_member_list(&html, Chamber::Senate);

        assert_eq!(senators.len(), 3, "The card without a district is skipped");
        assert!(senators.iter().all(|s| s.chamber == Chamber::Senate));
        assert!(senators.iter().all(|s| s.house_seat.is_none()));

        let first = &senators[0];
        assert_eq!(first.name, "Mary Souza");
        assert_eq!(first.party, Party::Republican);
        assert_eq!(first.district, 1);
        assert_eq!(first.contact.email, "msouza@senate.idaho.gov");
        assert_eq!(first.contact.home_phone.as_deref(), Some("(208) 555-0101"));
        assert_eq!(
            first.contact.statehouse_phone.as_deref(),
            Some("(208) 332-1301")
        );
        assert_eq!(first.occupation.as_deref(), Some("Retired Educator"));

        let names: Vec<_> = senators.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Mary Souza", "Melissa Wintrow", "Carl Crabtree"]);
        assert_eq!(senators[1].party, Party::Democrat);
    }

    #[test]
    fn test_parse_member_list_falls_back_to_rows() {
        let html = fs::read_to_string("fixtures/house_membership.html")
            .expect("Failed to read fixture");

        let reps = parse_member_list(&html, Chamber::House);

        assert_eq!(reps.len(), 4, "The header row is skipped");
        assert!(reps.iter().all(|r| r.chamber == Chamber::House));

        let seats: Vec<_> = reps.iter().map(|r| (r.district, r.house_seat)).collect();
        assert_eq!(
            seats,
            [
                (1, Some(HouseSeat::A)),
                (1, Some(HouseSeat::B)),
                (19, Some(HouseSeat::A)),
                (19, None),
            ]
        );
        assert_eq!(reps[2].party, Party::Democrat);
        assert_eq!(reps[2].occupation.as_deref(), Some("Attorney"));
    }

    #[test]
    fn test_parse_member_list_without_entries() {
        let html = "<html><body><p>Membership coming soon</p></body></html>";
        assert!(parse_member_list(html, Chamber::Senate).is_empty());
    }
}
