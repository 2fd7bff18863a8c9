use anyhow::Result;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() as usize) % items.len()]
    }
}

const HEADERS: [&str; 13] = [
    "pl_name",
    "hostname",
    "pl_letter",
    "discoverymethod",
    "disc_facility",
    "disc_year",
    "pl_orbper",
    "pl_rade",
    "pl_bmasse",
    "pl_dens",
    "pl_eqt",
    "st_spectype",
    "sy_dist",
];

struct Observation {
    pl_name: String,
    hostname: String,
    letter: String,
    method: String,
    facility: String,
    year: u32,
    orbper: f64,
    rade: f64,
    bmasse: f64,
    dens: f64,
    eqt: f64,
    spectype: String,
    dist: f64,
}

fn fmt(x: f64, decimals: usize) -> String {
    format!("{x:.decimals$}")
}

impl Observation {
    /// Serialize as a CSV record, blanking the fields listed in `omit`.
    fn record(&self, omit: &[&str]) -> Vec<String> {
        HEADERS
            .iter()
            .map(|&col| {
                if omit.contains(&col) {
                    return String::new();
                }
                match col {
                    "pl_name" => self.pl_name.clone(),
                    "hostname" => self.hostname.clone(),
                    "pl_letter" => self.letter.clone(),
                    "discoverymethod" => self.method.clone(),
                    "disc_facility" => self.facility.clone(),
                    "disc_year" => self.year.to_string(),
                    "pl_orbper" => fmt(self.orbper, 4),
                    "pl_rade" => fmt(self.rade, 2),
                    "pl_bmasse" => fmt(self.bmasse, 2),
                    "pl_dens" => fmt(self.dens, 2),
                    "pl_eqt" => fmt(self.eqt, 0),
                    "st_spectype" => self.spectype.clone(),
                    "sy_dist" => fmt(self.dist, 2),
                    _ => String::new(),
                }
            })
            .collect()
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(7);

    let prefixes = ["Kepler-", "HD ", "TOI-", "GJ ", "WASP-"];
    let spectypes = [
        "G2 V", "K1 V", "M3 V", "M5.5 V", "F8 V", "G8 IV", "K5 V", "M0 V",
    ];
    let letters = ["b", "c", "d"];

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut planets: Vec<Observation> = Vec::new();
    let mut duplicates = 0usize;

    for sys in 0..48u32 {
        let hostname = format!("{}{}", rng.pick(&prefixes), 100 + sys);
        let spectype = rng.pick(&spectypes).to_string();
        let dist = rng.gauss(4.6, 1.0).exp();
        let n_planets = 1 + (rng.next_u64() % 3) as usize;

        for letter in letters.iter().take(n_planets) {
            let r = rng.next_f64();
            let (method, facility) = if r < 0.60 {
                ("Transit", rng.pick(&["Kepler", "TESS", "SuperWASP"]))
            } else if r < 0.85 {
                ("Radial Velocity", rng.pick(&["La Silla Observatory", "Keck Observatory"]))
            } else if r < 0.95 {
                ("Microlensing", "OGLE")
            } else {
                ("Imaging", "Paranal Observatory")
            };

            let rade = rng.gauss(0.8, 0.7).exp().min(25.0);
            let bmasse = rade.powf(2.06) * (0.8 + 0.4 * rng.next_f64());
            let obs = Observation {
                pl_name: format!("{hostname} {letter}"),
                hostname: hostname.clone(),
                letter: letter.to_string(),
                method: method.to_string(),
                facility: facility.to_string(),
                year: 1995 + (rng.next_u64() % 30) as u32,
                orbper: rng.gauss(2.3, 1.4).exp(),
                rade,
                bmasse,
                dens: 5.51 * bmasse / rade.powi(3),
                eqt: 150.0 + rng.next_f64() * 2000.0,
                spectype: spectype.clone(),
                dist,
            };

            if rng.next_f64() < 0.35 {
                // Two submissions for the same planet: the first lacks mass
                // and density, a later refinement fills them in.
                rows.push(obs.record(&["pl_bmasse", "pl_dens"]));
                rows.push(obs.record(&[]));
                duplicates += 1;
            } else if rng.next_f64() < 0.15 {
                rows.push(obs.record(&["pl_eqt", "st_spectype"]));
            } else {
                rows.push(obs.record(&[]));
            }
            planets.push(obs);
        }
    }

    let catalog_path = "exoplanets.csv";
    let mut writer = csv::Writer::from_path(catalog_path)?;
    writer.write_record(HEADERS)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let enrichment_path = "descriptions.csv";
    let mut writer = csv::Writer::from_path(enrichment_path)?;
    writer.write_record(["hostname", "pl_letter", "display_name", "description"])?;
    for obs in planets.iter().step_by(4) {
        let description = format!(
            "{} orbits {} every {} days and was discovered in {} via the {} method.",
            obs.pl_name,
            obs.hostname,
            fmt(obs.orbper, 1),
            obs.year,
            obs.method
        );
        writer.write_record([
            obs.hostname.as_str(),
            obs.letter.as_str(),
            obs.pl_name.as_str(),
            description.as_str(),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {} observation rows ({} planets, {duplicates} duplicated) to {catalog_path}, \
         {} descriptions to {enrichment_path}",
        rows.len(),
        planets.len(),
        planets.len().div_ceil(4),
    );
    Ok(())
}
