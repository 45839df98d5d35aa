use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const AGENCIES: [&str; 8] = [
    "Agency for International Development (USAID)",
    "Department of Health and Human Services (HHS)",
    "National Science Foundation (NSF)",
    "National Science Foundation",
    "Department of Justice (DOJ)",
    "Department of Defense",
    "Department of Education (ED)",
    "Environmental Protection Agency",
];

const RECIPIENTS: [&str; 10] = [
    "Horizon Community Partners",
    "Bright Futures Institute",
    "Keystone Research Group",
    "Unity Works LLC",
    "Cascade Analytics",
    "Summit Training Associates",
    "Riverside Education Trust",
    "Lakeshore Consulting",
    "Beacon Outreach Alliance",
    "Northstar Policy Lab",
];

const THEMES: [&str; 6] = [
    "equity",
    "inclusion",
    "workforce diversity",
    "accessibility",
    "community outreach",
    "supplier diversity",
];

const ACTIVITIES: [&str; 6] = [
    "Technical assistance and program support",
    "Training and curriculum development",
    "Community engagement and outreach services",
    "Workforce development pilot program",
    "Research on program participation outcomes",
    "Accessibility compliance review and remediation",
];

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    let span_days = (end - start).num_days();

    let output_path = "dei_contracts_master.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "award_id",
            "recipient_name",
            "awarding_agency_name",
            "award_amount",
            "action_date",
            "award_description",
            "dei_themes",
        ])
        .expect("Failed to write header");

    let n_rows = 500;
    for row in 0..n_rows {
        let agency = rng.pick(&AGENCIES);
        let recipient = rng.pick(&RECIPIENTS);
        let activity = rng.pick(&ACTIVITIES);

        // Log-uniform amounts between $1K and $10M.
        let amount = 10f64.powf(3.0 + rng.next_f64() * 4.0);
        // Some exports carry formatted currency strings; mirror that.
        let amount_field = if rng.next_f64() < 0.3 {
            let cents = (amount * 100.0).round() as u64;
            let mut dollars = (cents / 100).to_string();
            let mut grouped = String::new();
            while dollars.len() > 3 {
                let split = dollars.len() - 3;
                grouped = format!(",{}{}", &dollars[split..], grouped);
                dollars.truncate(split);
            }
            format!("${dollars}{grouped}.{:02}", cents % 100)
        } else {
            format!("{amount:.2}")
        };

        let action_date = start + Duration::days((rng.next_u64() % span_days as u64) as i64);

        let mut themes: Vec<&str> = Vec::new();
        for theme in THEMES {
            if rng.next_f64() < 0.3 {
                themes.push(theme);
            }
        }

        writer
            .write_record([
                format!("CONT-2023-{row:05}"),
                recipient.to_string(),
                agency.to_string(),
                amount_field,
                action_date.format("%Y-%m-%d").to_string(),
                format!("{activity} for {recipient}."),
                themes.join(";"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} contract records to {output_path}");
}
