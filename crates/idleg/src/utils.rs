use crate::types::{AggregateResult, Legislator, Party};

pub const SEARCH_LIMIT: usize = 10;

/// The members representing one legislative district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictDelegation<'a> {
    pub district: u32,
    pub senator: Option<&'a Legislator>,
    pub representatives: Vec<&'a Legislator>,
}

impl<'a> DistrictDelegation<'a> {
    /// The first senator listed for `district` and every House member for it,
    /// in scrape order.
    pub fn for_district(data: &'a AggregateResult, district: u32) -> Self {
        DistrictDelegation {
            district,
            senator: data.senators.iter().find(|s| s.district == district),
            representatives: data
                .representatives
                .iter()
                .filter(|r| r.district == district)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.senator.is_none() && self.representatives.is_empty()
    }
}

impl std::fmt::Display for DistrictDelegation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "District {}", self.district)?;
        match self.senator {
            Some(senator) => writeln!(f, "  Senator: {}", senator)?,
            None => writeln!(f, "  Senator: unknown")?,
        }
        for rep in &self.representatives {
            writeln!(f, "  Representative: {}", rep)?;
        }
        Ok(())
    }
}

/// Case-insensitive substring search over senators, then representatives.
pub fn search_by_name<'a>(data: &'a AggregateResult, query: &str, limit: usize) -> Vec<&'a Legislator> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    data.legislators()
        .filter(|l| l.name.to_lowercase().contains(&query))
        .take(limit)
        .collect()
}

pub fn find_by_name<'a>(data: &'a AggregateResult, name: &str) -> Option<&'a Legislator> {
    search_by_name(data, name, 1).into_iter().next()
}

#[derive(Debug)]
pub struct MemberStats {
    pub senators: usize,
    pub representatives: usize,
    pub republicans: usize,
    pub democrats: usize,
    pub committees: usize,
}

impl MemberStats {
    pub fn from_result(data: &AggregateResult) -> MemberStats {
        MemberStats {
            senators: data.senators.len(),
            representatives: data.representatives.len(),
            republicans: data
                .legislators()
                .filter(|l| l.party == Party::Republican)
                .count(),
            democrats: data
                .legislators()
                .filter(|l| l.party == Party::Democrat)
                .count(),
            committees: data.committees.len(),
        }
    }
}

impl std::fmt::Display for MemberStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Senators:        {}", self.senators)?;
        writeln!(f, "  Representatives: {}", self.representatives)?;
        writeln!(f, "  Republicans:     {}", self.republicans)?;
        writeln!(f, "  Democrats:       {}", self.democrats)?;
        writeln!(f, "  Committees:      {}", self.committees)
    }
}
