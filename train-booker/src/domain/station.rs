//! SRT station identifiers.

use std::fmt;

/// Error returned when a name is not an SRT station.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{name}' is not an SRT station")]
pub struct UnknownStation {
    name: String,
}

impl UnknownStation {
    /// The name that failed to match.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A station served by SRT.
///
/// The booking site identifies stations by their Korean display name, so
/// that is what [`Station::parse`] accepts and [`Station::name`] returns.
///
/// # Examples
///
/// ```
/// use train_booker::domain::Station;
///
/// let station = Station::parse("동대구").unwrap();
/// assert_eq!(station, Station::DongDaegu);
/// assert_eq!(station.name(), "동대구");
///
/// assert!(Station::parse("서울").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Station {
    Suseo,
    Dongtan,
    PyeongtaekJije,
    CheonanAsan,
    Osong,
    Daejeon,
    GimcheonGumi,
    DongDaegu,
    SinGyeongju,
    UlsanTongdosa,
    Busan,
    Gongju,
    Iksan,
    Jeongeup,
    GwangjuSongjeong,
    Naju,
    Mokpo,
}

/// Every station with its display name, in line order.
const STATIONS: [(Station, &str); 17] = [
    (Station::Suseo, "수서"),
    (Station::Dongtan, "동탄"),
    (Station::PyeongtaekJije, "평택지제"),
    (Station::CheonanAsan, "천안아산"),
    (Station::Osong, "오송"),
    (Station::Daejeon, "대전"),
    (Station::GimcheonGumi, "김천(구미)"),
    (Station::DongDaegu, "동대구"),
    (Station::SinGyeongju, "신경주"),
    (Station::UlsanTongdosa, "울산(통도사)"),
    (Station::Busan, "부산"),
    (Station::Gongju, "공주"),
    (Station::Iksan, "익산"),
    (Station::Jeongeup, "정읍"),
    (Station::GwangjuSongjeong, "광주송정"),
    (Station::Naju, "나주"),
    (Station::Mokpo, "목포"),
];

impl Station {
    /// Look up a station by its display name.
    ///
    /// Surrounding whitespace is ignored; anything else must match exactly.
    pub fn parse(s: &str) -> Result<Self, UnknownStation> {
        let trimmed = s.trim();
        STATIONS
            .iter()
            .find(|(_, name)| *name == trimmed)
            .map(|(station, _)| *station)
            .ok_or_else(|| UnknownStation {
                name: s.to_string(),
            })
    }

    /// Returns the display name used by the booking site.
    pub fn name(&self) -> &'static str {
        // Every variant appears in STATIONS
        STATIONS
            .iter()
            .find(|(station, _)| station == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    /// Iterate over all known stations.
    pub fn all() -> impl Iterator<Item = Station> {
        STATIONS.iter().map(|(station, _)| *station)
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.name())
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_stations() {
        assert_eq!(Station::parse("수서").unwrap(), Station::Suseo);
        assert_eq!(Station::parse("부산").unwrap(), Station::Busan);
        assert_eq!(Station::parse("김천(구미)").unwrap(), Station::GimcheonGumi);
        assert_eq!(
            Station::parse("울산(통도사)").unwrap(),
            Station::UlsanTongdosa
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Station::parse("  동탄 ").unwrap(), Station::Dongtan);
    }

    #[test]
    fn reject_unknown() {
        assert!(Station::parse("").is_err());
        assert!(Station::parse("서울").is_err());
        assert!(Station::parse("김천").is_err());
        assert!(Station::parse("Busan").is_err());
    }

    #[test]
    fn unknown_keeps_original_name() {
        let err = Station::parse("용산").unwrap_err();
        assert_eq!(err.name(), "용산");
        assert_eq!(err.to_string(), "'용산' is not an SRT station");
    }

    #[test]
    fn name_roundtrip_for_every_station() {
        for station in Station::all() {
            assert_eq!(Station::parse(station.name()).unwrap(), station);
        }
        assert_eq!(Station::all().count(), 17);
    }

    #[test]
    fn display_and_debug() {
        let station = Station::parse("오송").unwrap();
        assert_eq!(format!("{}", station), "오송");
        assert_eq!(format!("{:?}", station), "Station(오송)");
    }
}
