//! Identity text generation: Polish names, logins, emails, phone numbers,
//! and the in-run uniqueness registry.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::internet::en::Password;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use blood_bank::Sex;

const MALE_FIRST_NAMES: &[&str] = &[
    "Jan", "Piotr", "Krzysztof", "Andrzej", "Tomasz", "Paweł", "Michał", "Marcin", "Jakub",
    "Adam", "Łukasz", "Mateusz", "Marek", "Grzegorz", "Wojciech", "Rafał", "Maciej", "Kamil",
    "Dariusz", "Przemysław",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Anna", "Maria", "Katarzyna", "Małgorzata", "Agnieszka", "Barbara", "Ewa", "Magdalena",
    "Joanna", "Aleksandra", "Zofia", "Monika", "Teresa", "Danuta", "Natalia", "Julia",
    "Karolina", "Paulina", "Żaneta", "Świętosława",
];

const MALE_LAST_NAMES: &[&str] = &[
    "Nowak", "Kowalski", "Wiśniewski", "Wójcik", "Kowalczyk", "Kamiński", "Lewandowski",
    "Zieliński", "Szymański", "Woźniak", "Dąbrowski", "Kozłowski", "Jankowski", "Mazur",
    "Wojciechowski", "Kwiatkowski", "Krawczyk", "Piotrowski", "Grabowski", "Zając",
];

const FEMALE_LAST_NAMES: &[&str] = &[
    "Nowak", "Kowalska", "Wiśniewska", "Wójcik", "Kowalczyk", "Kamińska", "Lewandowska",
    "Zielińska", "Szymańska", "Woźniak", "Dąbrowska", "Kozłowska", "Jankowska", "Mazur",
    "Wojciechowska", "Kwiatkowska", "Krawczyk", "Piotrowska", "Grabowska", "Zając",
];

pub(crate) const CITIES: &[&str] = &[
    "Warszawa", "Kraków", "Łódź", "Wrocław", "Poznań", "Gdańsk", "Szczecin", "Bydgoszcz",
    "Lublin", "Białystok", "Katowice", "Gdynia", "Częstochowa", "Radom", "Toruń", "Rzeszów",
];

pub(crate) const STREETS: &[&str] = &[
    "Kwiatowa", "Złota", "Generalna", "Wyszyńskiego", "Polna", "Leśna", "Słoneczna", "Krótka",
    "Ogrodowa", "Lipowa",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.com", "webmail.com", "testmail.com", "demo.com"];

const LOGIN_SEPARATORS: &[&str] = &["", ".", "_", "-"];
const EMAIL_SEPARATORS: &[&str] = &[".", "_"];

/// A sampled first/last name pair.
#[derive(Debug, Clone)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

/// Samples a name matching the given sex.
pub fn person_name(sex: Sex, rng: &mut impl Rng) -> PersonName {
    let (firsts, lasts) = match sex {
        Sex::Male => (MALE_FIRST_NAMES, MALE_LAST_NAMES),
        Sex::Female => (FEMALE_FIRST_NAMES, FEMALE_LAST_NAMES),
    };
    PersonName {
        first: (*firsts.choose(rng).unwrap()).to_string(),
        last: (*lasts.choose(rng).unwrap()).to_string(),
    }
}

/// Samples a name of either sex.
pub fn any_person_name(rng: &mut impl Rng) -> PersonName {
    let sex = if rng.r#gen::<bool>() { Sex::Male } else { Sex::Female };
    person_name(sex, rng)
}

/// Replaces Polish diacritics with their ASCII equivalents.
pub fn fold_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            'ü' => 'u',
            'Ą' => 'A',
            'Ć' => 'C',
            'Ę' => 'E',
            'Ł' => 'L',
            'Ń' => 'N',
            'Ó' => 'O',
            'Ś' => 'S',
            'Ź' | 'Ż' => 'Z',
            'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// Lowercases, strips spaces, and folds diacritics for use in identifiers.
fn normalize(part: &str) -> String {
    fold_diacritics(&part.to_lowercase().replace(' ', ""))
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Builds a login candidate from one of five name patterns plus a numeric
/// suffix.
pub fn login_candidate(name: &PersonName, rng: &mut impl Rng) -> String {
    let first = normalize(&name.first);
    let last = normalize(&name.last);
    let separator = LOGIN_SEPARATORS.choose(rng).unwrap();

    let options = [
        format!("{}{}", prefix(&first, 1), last),
        format!("{}{}", first, prefix(&last, 1)),
        format!("{first}{separator}{last}"),
        format!("{}{}", prefix(&first, 3), prefix(&last, 3)),
        format!("{}{}", last, prefix(&first, 1)),
    ];

    let base = options.choose(rng).unwrap();
    format!("{base}{}", rng.gen_range(1..10000))
}

/// Appends a digit, the way a taken login is disambiguated.
pub fn bump_login(candidate: &str, rng: &mut impl Rng) -> String {
    format!("{candidate}{}", rng.gen_range(1..10))
}

/// Builds an email candidate from the same name patterns and a pool of
/// throwaway domains.
pub fn email_candidate(name: &PersonName, rng: &mut impl Rng) -> String {
    let first = normalize(&name.first);
    let last = normalize(&name.last);
    let separator = EMAIL_SEPARATORS.choose(rng).unwrap();

    let options = [
        format!("{}{}", prefix(&first, 1), last),
        format!("{}{}", first, prefix(&last, 1)),
        format!("{first}{separator}{last}"),
        format!("{}{}", prefix(&first, 3), prefix(&last, 3)),
        format!("{}{}", last, prefix(&first, 1)),
    ];

    let local = options.choose(rng).unwrap();
    let domain = EMAIL_DOMAINS.choose(rng).unwrap();
    format!("{local}{}@{domain}", rng.gen_range(1..10000))
}

/// Inserts a digit before the `@`, the way a taken email is disambiguated.
pub fn bump_email(candidate: &str, rng: &mut impl Rng) -> String {
    let digit = rng.gen_range(1..10);
    match candidate.find('@') {
        Some(at) => format!("{}{digit}{}", &candidate[..at], &candidate[at..]),
        None => format!("{candidate}{digit}"),
    }
}

/// Generates a nine-digit phone number.
pub fn phone_candidate(rng: &mut impl Rng) -> String {
    (0..9)
        .map(|_| char::from_digit(rng.gen_range(0..10), 10).unwrap())
        .collect()
}

/// Generates a ten-character password with `_` swapped for `!` so the value
/// survives the exercise's import tooling.
pub fn password(rng: &mut impl Rng) -> String {
    let raw: String = Password(10..11).fake_with_rng(rng);
    raw.replace('_', "!")
}

/// Builds a Polish-style street address.
pub fn street_address(rng: &mut impl Rng) -> String {
    let street = STREETS.choose(rng).unwrap();
    let building = rng.gen_range(1..1000);
    let zip = format!("{:02}-{:03}", rng.gen_range(0..100), rng.gen_range(0..1000));
    let city = CITIES.choose(rng).unwrap();
    format!("ul. {street} {building}, {zip} {city}")
}

/// Error raised when the rejection-sampling loop runs out of attempts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no unique candidate found after {attempts} attempts")]
pub struct UniquenessExhausted {
    pub attempts: usize,
}

/// In-run registry of claimed values for a unique column.
///
/// Mirrors the retry-until-unique loops the seeding scripts run against the
/// database, except the bookkeeping is in memory and the loop is bounded.
#[derive(Debug)]
pub struct UniqueSet {
    seen: HashSet<String>,
    max_attempts: usize,
}

impl Default for UniqueSet {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueSet {
    pub fn new() -> Self {
        Self::with_max_attempts(100)
    }

    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            seen: HashSet::new(),
            max_attempts,
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Claims a value drawn by `draw`, nudging collisions with `mutate`
    /// until an unseen value appears.
    pub fn claim<R: Rng>(
        &mut self,
        rng: &mut R,
        draw: impl FnOnce(&mut R) -> String,
        mut mutate: impl FnMut(&str, &mut R) -> String,
    ) -> Result<String, UniquenessExhausted> {
        let mut candidate = draw(rng);
        for _ in 0..self.max_attempts {
            if self.seen.insert(candidate.clone()) {
                return Ok(candidate);
            }
            candidate = mutate(&candidate, rng);
        }
        Err(UniquenessExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Claims a value by redrawing from scratch on every collision.
    pub fn claim_redraw<R: Rng>(
        &mut self,
        rng: &mut R,
        mut draw: impl FnMut(&mut R) -> String,
    ) -> Result<String, UniquenessExhausted> {
        for _ in 0..self.max_attempts {
            let candidate = draw(rng);
            if self.seen.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(UniquenessExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn folds_all_polish_letters() {
        assert_eq!(fold_diacritics("Łukasz Żółć"), "Lukasz Zolc");
        assert_eq!(fold_diacritics("świętosława"), "swietoslawa");
        assert_eq!(fold_diacritics("plain ascii"), "plain ascii");
    }

    #[test]
    fn login_is_ascii_lowercase() {
        let mut rng = StdRng::seed_from_u64(3);
        let name = PersonName {
            first: "Świętosława".into(),
            last: "Dąbrowska".into(),
        };
        for _ in 0..50 {
            let login = login_candidate(&name, &mut rng);
            assert!(login.is_ascii(), "non-ascii login: {login}");
            assert!(!login.contains(' '));
            assert!(!login.chars().any(|c| c.is_uppercase()));
        }
    }

    #[test]
    fn email_bump_keeps_domain() {
        let mut rng = StdRng::seed_from_u64(3);
        let bumped = bump_email("anowak12@example.com", &mut rng);
        assert!(bumped.ends_with("@example.com"));
        assert!(bumped.len() > "anowak12@example.com".len());
    }

    #[test]
    fn phone_is_nine_digits() {
        let mut rng = StdRng::seed_from_u64(3);
        let phone = phone_candidate(&mut rng);
        assert_eq!(phone.len(), 9);
        assert!(phone.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn password_has_no_underscores() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(!password(&mut rng).contains('_'));
        }
    }

    #[test]
    fn unique_set_retries_collisions() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut set = UniqueSet::new();

        let first = set
            .claim(&mut rng, |_| "taken".to_string(), bump_login)
            .unwrap();
        assert_eq!(first, "taken");

        let second = set
            .claim(&mut rng, |_| "taken".to_string(), bump_login)
            .unwrap();
        assert_ne!(second, "taken");
        assert!(second.starts_with("taken"));
    }

    #[test]
    fn unique_set_gives_up_eventually() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut set = UniqueSet::with_max_attempts(5);

        set.claim(&mut rng, |_| "stuck".into(), |c, _| c.to_string())
            .unwrap();
        let err = set
            .claim(&mut rng, |_| "stuck".into(), |c, _| c.to_string())
            .unwrap_err();
        assert_eq!(err.attempts, 5);
    }
}
