//! Built-in training plan - weekly split and exercise catalog

use chrono::{Datelike, Local, Weekday};

/// One day of the weekly split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    pub id: &'static str,
    pub label: &'static str,
    pub full_name: &'static str,
    pub focus: &'static str,
}

impl WeekDay {
    /// Rest days carry no exercises and no logging UI
    pub fn is_rest(&self) -> bool {
        exercises_for_day(self.id).is_empty()
    }
}

/// Catalog exercise. Never mutated or deleted at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub id: &'static str,
    pub day: &'static str,
    pub name: &'static str,
    pub muscle: &'static str,
    pub function: Option<&'static str>,
}

pub const WEEK_DAYS: &[WeekDay] = &[
    WeekDay { id: "lun", label: "LUN", full_name: "Lunedì", focus: "Full Push" },
    WeekDay { id: "mar", label: "MAR", full_name: "Martedì", focus: "Full Pull" },
    WeekDay { id: "mer", label: "MER", full_name: "Mercoledì", focus: "Rest" },
    WeekDay { id: "gio", label: "GIO", full_name: "Giovedì", focus: "Upper Push" },
    WeekDay { id: "ven", label: "VEN", full_name: "Venerdì", focus: "Upper Pull" },
    WeekDay { id: "sab", label: "SAB", full_name: "Sabato", focus: "Legs" },
    WeekDay { id: "dom", label: "DOM", full_name: "Domenica", focus: "Rest" },
];

pub const EXERCISES: &[Exercise] = &[
    // Lunedì - Full Push
    Exercise {
        id: "lun_1",
        day: "lun",
        name: "Spinte con manubri (Panca 30°)",
        muscle: "Petto Alto",
        function: Some("Spinta inclinata"),
    },
    Exercise {
        id: "lun_2",
        day: "lun",
        name: "Pec Deck",
        muscle: "Petto Isolamento",
        function: Some("Adduzione orizzontale"),
    },
    Exercise {
        id: "lun_3",
        day: "lun",
        name: "Lento avanti con manubri",
        muscle: "Spalle",
        function: Some("Spinta verticale"),
    },
    Exercise {
        id: "lun_4",
        day: "lun",
        name: "Alzate laterali ai cavi",
        muscle: "Spalle Lat.",
        function: Some("Abduzione"),
    },
    Exercise {
        id: "lun_8",
        day: "lun",
        name: "Hack Squat (Quad Focus)",
        muscle: "Quadricipiti",
        function: Some("Accosciata"),
    },
    Exercise {
        id: "lun_5",
        day: "lun",
        name: "Leg Extension",
        muscle: "Quadricipiti",
        function: Some("Estensione ginocchio"),
    },
    Exercise {
        id: "lun_6",
        day: "lun",
        name: "Calf Press a gamba estesa",
        muscle: "Polpacci",
        function: Some("Flessione plantare"),
    },
    Exercise {
        id: "lun_7",
        day: "lun",
        name: "Pushdown Tricipiti (Cavo alto)",
        muscle: "Tricipiti",
        function: Some("Estensione gomito"),
    },
    // Martedì - Full Pull
    Exercise {
        id: "mar_1",
        day: "mar",
        name: "RDL (Stacchi Rumeni) manubri",
        muscle: "Femorali/Glutei",
        function: Some("Estensione anca"),
    },
    Exercise {
        id: "mar_2",
        day: "mar",
        name: "T-Bar Row",
        muscle: "Upper Back",
        function: Some("Retrazione scapolare"),
    },
    Exercise {
        id: "mar_3",
        day: "mar",
        name: "Lat Machine presa neutra",
        muscle: "Schiena Ampiezza",
        function: Some("Estensione spalla"),
    },
    Exercise {
        id: "mar_4",
        day: "mar",
        name: "Leg Curl Seduto",
        muscle: "Femorali",
        function: Some("Flessione ginocchio"),
    },
    Exercise {
        id: "mar_5",
        day: "mar",
        name: "Preacher Curl (Panca Scott)",
        muscle: "Bicipiti",
        function: Some("Flessione gomito"),
    },
    Exercise {
        id: "mar_6",
        day: "mar",
        name: "Rope Hammer Curl",
        muscle: "Bicipiti/Brachiale",
        function: Some("Flessione gomito neutra"),
    },
    Exercise {
        id: "mar_7",
        day: "mar",
        name: "Crunch al cavo alto",
        muscle: "Addome",
        function: Some("Flessione tronco"),
    },
    // Giovedì - Upper Push
    Exercise {
        id: "gio_8",
        day: "gio",
        name: "Panca 30° al Multipower",
        muscle: "Petto Alto",
        function: Some("Spinta inclinata"),
    },
    Exercise {
        id: "gio_1",
        day: "gio",
        name: "Croci al cavo alto",
        muscle: "Petto",
        function: Some("Adduzione orizzontale"),
    },
    Exercise {
        id: "gio_2",
        day: "gio",
        name: "Chest Press",
        muscle: "Petto",
        function: Some("Spinta orizzontale"),
    },
    Exercise {
        id: "gio_3",
        day: "gio",
        name: "Shoulder Press Machine",
        muscle: "Spalle",
        function: Some("Spinta verticale"),
    },
    Exercise {
        id: "gio_4",
        day: "gio",
        name: "Alzate laterali con manubri",
        muscle: "Spalle Lat.",
        function: Some("Abduzione"),
    },
    Exercise {
        id: "gio_5",
        day: "gio",
        name: "Overhead Extension cavi",
        muscle: "Tricipiti",
        function: Some("Estensione gomito"),
    },
    Exercise {
        id: "gio_6",
        day: "gio",
        name: "Pushdown ai cavi",
        muscle: "Tricipiti",
        function: Some("Estensione gomito"),
    },
    // Venerdì - Upper Pull
    Exercise {
        id: "ven_1",
        day: "ven",
        name: "T-Bar Row (Focus Trapezi)",
        muscle: "Upper Back",
        function: Some("Retrazione scapolare"),
    },
    Exercise {
        id: "ven_2",
        day: "ven",
        name: "Lat Machine (Presa larga)",
        muscle: "Schiena Ampiezza",
        function: Some("Adduzione omero"),
    },
    Exercise {
        id: "ven_3",
        day: "ven",
        name: "Rematore manubri Panca 45°",
        muscle: "Dorsali",
        function: Some("Estensione spalla"),
    },
    Exercise {
        id: "ven_4",
        day: "ven",
        name: "Reverse Pec Deck",
        muscle: "Deltoidi Post.",
        function: Some("Abduzione orizzontale"),
    },
    Exercise {
        id: "ven_5",
        day: "ven",
        name: "Curl alternato con manubri",
        muscle: "Bicipiti",
        function: Some("Flessione gomito"),
    },
    Exercise {
        id: "ven_6",
        day: "ven",
        name: "Reverse Curl ai cavi",
        muscle: "Avambracci",
        function: Some("Flessione gomito prona"),
    },
    Exercise {
        id: "ven_7",
        day: "ven",
        name: "Wrist Curl con manubri",
        muscle: "Flessori Polso",
        function: Some("Flessione polso"),
    },
    // Sabato - Legs
    Exercise {
        id: "sab_1",
        day: "sab",
        name: "Back Squat",
        muscle: "Quadricipiti",
        function: Some("Accosciata"),
    },
    Exercise {
        id: "sab_2",
        day: "sab",
        name: "Leg Extension",
        muscle: "Quadricipiti",
        function: Some("Estensione ginocchio"),
    },
    Exercise {
        id: "sab_3",
        day: "sab",
        name: "Leg Curl seduto",
        muscle: "Femorali",
        function: Some("Flessione ginocchio"),
    },
    Exercise {
        id: "sab_4",
        day: "sab",
        name: "Hyperextension",
        muscle: "Glutei",
        function: Some("Estensione anca"),
    },
    Exercise {
        id: "sab_5",
        day: "sab",
        name: "Adductor Machine",
        muscle: "Interno Coscia",
        function: Some("Adduzione anca"),
    },
    Exercise {
        id: "sab_6",
        day: "sab",
        name: "Calf Raise a gamba tesa",
        muscle: "Polpacci",
        function: Some("Flessione plantare"),
    },
    Exercise {
        id: "sab_7",
        day: "sab",
        name: "Hanging Leg Raises",
        muscle: "Addome Basso",
        function: Some("Flessione anca"),
    },
    Exercise {
        id: "sab_8",
        day: "sab",
        name: "Crunch su panca declinata",
        muscle: "Addome",
        function: Some("Flessione tronco"),
    },
];

/// Exercises of one day, in catalog (default) order
pub fn exercises_for_day(day_id: &str) -> Vec<&'static Exercise> {
    EXERCISES.iter().filter(|ex| ex.day == day_id).collect()
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    EXERCISES.iter().find(|ex| ex.id == id)
}

pub fn find_day(id: &str) -> Option<&'static WeekDay> {
    WEEK_DAYS.iter().find(|d| d.id == id)
}

/// Day id for the current local weekday (the startup default)
pub fn today_id() -> &'static str {
    match Local::now().weekday() {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mer",
        Weekday::Thu => "gio",
        Weekday::Fri => "ven",
        Weekday::Sat => "sab",
        Weekday::Sun => "dom",
    }
}
