use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
            Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}
id_newtype!(SubjectName);
id_newtype!(GroupTitle);
id_newtype!(LecturerName);
id_newtype!(ClassroomName);

/// Working day of the week. Declaration order is chronological.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
pub enum Day {
    #[serde(alias = "monday", alias = "mon")]
    Monday,
    #[serde(alias = "tuesday", alias = "tue")]
    Tuesday,
    #[serde(alias = "wednesday", alias = "wed")]
    Wednesday,
    #[serde(alias = "thursday", alias = "thu")]
    Thursday,
    #[serde(alias = "friday", alias = "fri")]
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Period index within a day. Input files write it either as a number or as
/// a numeric string (`"2"`), both are accepted.
#[derive(
    Clone, Copy, Debug, Serialize, ToSchema, JsonSchema, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
#[serde(transparent)]
pub struct Period(pub u8);

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u8),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Period(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<u8>()
                .map(Period)
                .map_err(|e| serde::de::Error::custom(format!("invalid period {s:?}: {e}"))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A (day, period) pair. Ordered by day first, then period.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
pub struct Timeslot {
    pub day: Day,
    #[serde(rename = "time")]
    pub period: Period,
}

impl Timeslot {
    pub fn new(day: Day, period: u8) -> Self {
        Self {
            day,
            period: Period(period),
        }
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.day, self.period)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct Subject {
    pub name: SubjectName,
    /// Sessions per week every group taking the subject must receive.
    pub hours: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct Classroom {
    pub name: ClassroomName,
    pub max_student_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct Lecturer {
    pub name: LecturerName,
    #[serde(default)]
    pub can_teach: Vec<SubjectName>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct Group {
    pub title: GroupTitle,
    pub student_count: u32,
    #[serde(default)]
    pub subject_names: Vec<SubjectName>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Instance {
    pub times: Vec<Timeslot>,
    pub subjects: Vec<Subject>,
    pub groups: Vec<Group>,
    pub lectors: Vec<Lecturer>,
    pub classrooms: Vec<Classroom>,
}

impl Instance {
    /// Total number of sessions a complete schedule must contain.
    pub fn required_sessions(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.subject_names.iter())
            .filter_map(|name| self.subjects.iter().find(|s| &s.name == name))
            .map(|s| s.hours as usize)
            .sum()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Weights {
    pub group_windows: f64,
    pub lecturer_windows: f64,
    pub time_earliness: f64,
    pub capacity_fill: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            group_windows: 1.0,
            lecturer_windows: 1.0,
            time_earliness: 0.5,
            capacity_fill: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(default)]
pub struct GaParams {
    pub population_size: usize,
    pub max_generations: u32,
    /// Consecutive generations with an unchanged best fitness before stopping.
    pub stagnation_limit: u32,
    pub tournament_size: usize,
    pub mutation_probability: f64,
    /// Mutation attempts applied to an empty schedule before the fill pass.
    pub warmup_mutations: u32,
    /// Initialization restarts allowed per individual.
    pub max_init_attempts: u32,
    /// Best individuals copied unchanged into the next generation.
    pub elitism: usize,
    pub seed: u64,
    pub weights: Weights,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            stagnation_limit: 10,
            tournament_size: 10,
            mutation_probability: 0.5,
            warmup_mutations: 1000,
            max_init_attempts: 1000,
            elitism: 1,
            seed: 0,
            weights: Weights::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveEnvelope {
    pub instance: Instance,
    #[serde(default)]
    pub params: GaParams,
}

/// One completed session of the output timetable.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct SessionRow {
    pub group: GroupTitle,
    pub subject: SubjectName,
    pub lecturer: LecturerName,
    pub classroom: ClassroomName,
    pub day: Day,
    #[serde(rename = "time")]
    pub period: Period,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveResult {
    pub status: String,
    pub objective: f64,
    pub fitness: f64,
    pub assignments: Vec<SessionRow>,
    pub stats: serde_json::Value,
}
