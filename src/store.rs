use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

const ID_RANGE_START: u64 = 1000;
const ID_RANGE_END: u64 = 10_000;
const MAX_RANDOM_DRAWS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub grade: String,
}

impl Teacher {
    pub fn new(id: &str, name: &str, subject: &str, grade: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            subject: subject.to_string(),
            grade: grade.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMode {
    #[serde(rename = "UPI")]
    Upi,
    Cash,
    Card,
    NetBanking,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Upi,
        PaymentMode::Cash,
        PaymentMode::Card,
        PaymentMode::NetBanking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
            PaymentMode::NetBanking => "NetBanking",
        }
    }

    /// Exact, case-sensitive match against the wire labels.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: String,
    pub student_name: String,
    pub class_name: String,
    pub roll_no: String,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(serialize_with = "serialize_timestamp")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub device_id: String,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "serialize_timestamp")]
    pub verified_at: DateTime<Utc>,
}

pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2026-10-14T09:30:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

/// Issues `<prefix>-<digits>` identifiers that never repeat for the lifetime
/// of the generator.
///
/// Numbers are drawn at random from `[1000, 10000)`. A draw that hits an
/// already issued number is redrawn; after `MAX_RANDOM_DRAWS` misses the
/// generator falls back to counting upwards from the end of the range.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: &'static str,
    issued: HashSet<u64>,
    overflow_next: u64,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            issued: HashSet::new(),
            overflow_next: ID_RANGE_END,
        }
    }

    /// Marks an existing identifier as taken. Returns false when the id does
    /// not carry this generator's prefix or was already taken.
    pub fn reserve(&mut self, id: &str) -> bool {
        let Some(number) = id
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|digits| digits.parse::<u64>().ok())
        else {
            return false;
        };
        self.issued.insert(number)
    }

    pub fn generate(&mut self) -> String {
        let mut rng = rand::rng();
        for _ in 0..MAX_RANDOM_DRAWS {
            let number = rng.random_range(ID_RANGE_START..ID_RANGE_END);
            if self.issued.insert(number) {
                return self.format(number);
            }
        }
        loop {
            let number = self.overflow_next;
            self.overflow_next += 1;
            if self.issued.insert(number) {
                return self.format(number);
            }
        }
    }

    fn format(&self, number: u64) -> String {
        format!("{}-{}", self.prefix, number)
    }
}

/// Process-lifetime record collections. Teachers are fixed at construction;
/// fees and attendance are append-only and keep insertion order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    teachers: Vec<Teacher>,
    fees: Vec<FeeRecord>,
    attendance: Vec<AttendanceRecord>,
    fee_ids: IdGenerator,
    attendance_ids: IdGenerator,
}

impl RecordStore {
    pub fn with_teachers(teachers: Vec<Teacher>) -> Self {
        Self {
            teachers,
            fees: Vec::new(),
            attendance: Vec::new(),
            fee_ids: IdGenerator::new("F"),
            attendance_ids: IdGenerator::new("A"),
        }
    }

    pub fn empty() -> Self {
        Self::with_teachers(Vec::new())
    }

    /// Fixture data loaded at startup. The seeded fee is dated 30 minutes and
    /// the check-in 10 minutes before `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut store = Self::with_teachers(vec![
            Teacher::new("T-101", "Meera Sharma", "Math", "6-8"),
            Teacher::new("T-102", "Arjun Singh", "Science", "9-10"),
            Teacher::new("T-103", "Farhan Ali", "English", "5-7"),
        ]);
        store.append_fee(FeeRecord {
            id: "F-9001".to_string(),
            student_name: "Riya Patel".to_string(),
            class_name: "8A".to_string(),
            roll_no: "18".to_string(),
            amount: 3500.0,
            payment_mode: PaymentMode::Upi,
            submitted_at: now - Duration::minutes(30),
        });
        store.append_attendance(AttendanceRecord {
            id: "A-7001".to_string(),
            teacher_id: "T-101".to_string(),
            teacher_name: "Meera Sharma".to_string(),
            device_id: "FR-1".to_string(),
            status: AttendanceStatus::Present,
            verified_at: now - Duration::minutes(10),
        });
        store
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn fees(&self) -> &[FeeRecord] {
        &self.fees
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn find_teacher(&self, teacher_id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == teacher_id)
    }

    pub fn next_fee_id(&mut self) -> String {
        self.fee_ids.generate()
    }

    pub fn next_attendance_id(&mut self) -> String {
        self.attendance_ids.generate()
    }

    pub fn append_fee(&mut self, record: FeeRecord) {
        // Ids minted by next_fee_id are already reserved; this covers records
        // built elsewhere (fixtures, tests).
        self.fee_ids.reserve(&record.id);
        self.fees.push(record);
    }

    pub fn append_attendance(&mut self, record: AttendanceRecord) {
        self.attendance_ids.reserve(&record.id);
        self.attendance.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_number(id: &str, prefix: &str) -> u64 {
        id.strip_prefix(prefix)
            .and_then(|r| r.strip_prefix('-'))
            .and_then(|d| d.parse().ok())
            .expect("prefixed numeric id")
    }

    #[test]
    fn generated_ids_use_prefix_and_range() {
        let mut ids = IdGenerator::new("F");
        for _ in 0..200 {
            let id = ids.generate();
            let n = id_number(&id, "F");
            assert!((ID_RANGE_START..ID_RANGE_END).contains(&n), "{id}");
        }
    }

    #[test]
    fn generated_ids_never_repeat() {
        let mut ids = IdGenerator::new("A");
        let mut seen = HashSet::new();
        for _ in 0..5000 {
            assert!(seen.insert(ids.generate()));
        }
    }

    #[test]
    fn saturated_range_continues_above_it() {
        let mut ids = IdGenerator::new("F");
        for n in ID_RANGE_START..ID_RANGE_END {
            assert!(ids.reserve(&format!("F-{n}")));
        }
        assert_eq!(ids.generate(), "F-10000");
        assert_eq!(ids.generate(), "F-10001");
    }

    #[test]
    fn reserve_rejects_foreign_prefix_and_duplicates() {
        let mut ids = IdGenerator::new("F");
        assert!(ids.reserve("F-9001"));
        assert!(!ids.reserve("F-9001"));
        assert!(!ids.reserve("A-9001"));
        assert!(!ids.reserve("F9001"));
        assert!(!ids.reserve("F-abc"));
    }

    #[test]
    fn seeded_store_has_fixture_rows() {
        let now = Utc::now();
        let store = RecordStore::seeded(now);
        assert_eq!(store.teachers().len(), 3);
        assert_eq!(store.fees().len(), 1);
        assert_eq!(store.attendance().len(), 1);
        assert_eq!(store.fees()[0].submitted_at, now - Duration::minutes(30));
        assert_eq!(
            store.find_teacher("T-102").map(|t| t.name.as_str()),
            Some("Arjun Singh")
        );
        assert!(store.find_teacher("t-102").is_none());
    }

    #[test]
    fn seeded_ids_are_never_reissued() {
        let mut store = RecordStore::seeded(Utc::now());
        for _ in 0..3000 {
            assert_ne!(store.next_fee_id(), "F-9001");
            assert_ne!(store.next_attendance_id(), "A-7001");
        }
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let now = Utc::now();
        let mut store = RecordStore::empty();
        for (i, offset) in [5i64, 50, 1].into_iter().enumerate() {
            store.append_fee(FeeRecord {
                id: format!("F-{}", 2000 + i),
                student_name: "S".to_string(),
                class_name: "1A".to_string(),
                roll_no: i.to_string(),
                amount: 10.0,
                payment_mode: PaymentMode::Cash,
                submitted_at: now - Duration::minutes(offset),
            });
        }
        let ids: Vec<&str> = store.fees().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["F-2000", "F-2001", "F-2002"]);
    }

    #[test]
    fn records_serialize_with_camel_case_and_millis() {
        let ts = DateTime::parse_from_rfc3339("2026-10-14T09:30:00.123456Z")
            .expect("ts")
            .with_timezone(&Utc);
        let fee = FeeRecord {
            id: "F-1234".to_string(),
            student_name: "A".to_string(),
            class_name: "8A".to_string(),
            roll_no: "1".to_string(),
            amount: 100.0,
            payment_mode: PaymentMode::NetBanking,
            submitted_at: ts,
        };
        let v = serde_json::to_value(&fee).expect("serialize");
        assert_eq!(v["studentName"], "A");
        assert_eq!(v["paymentMode"], "NetBanking");
        assert_eq!(v["submittedAt"], "2026-10-14T09:30:00.123Z");

        let log = AttendanceRecord {
            id: "A-1234".to_string(),
            teacher_id: "T-101".to_string(),
            teacher_name: "Meera Sharma".to_string(),
            device_id: "FR-1".to_string(),
            status: AttendanceStatus::Present,
            verified_at: ts,
        };
        let v = serde_json::to_value(&log).expect("serialize");
        assert_eq!(v["status"], "present");
        assert_eq!(v["teacherName"], "Meera Sharma");
        assert_eq!(v["verifiedAt"], "2026-10-14T09:30:00.123Z");
    }

    #[test]
    fn payment_mode_labels() {
        assert_eq!(PaymentMode::parse("UPI"), Some(PaymentMode::Upi));
        assert_eq!(PaymentMode::parse("NetBanking"), Some(PaymentMode::NetBanking));
        assert_eq!(PaymentMode::parse("upi"), None);
        assert_eq!(PaymentMode::parse("Cheque"), None);
        assert_eq!(
            serde_json::to_value(PaymentMode::Upi).expect("serialize"),
            "UPI"
        );
    }
}
