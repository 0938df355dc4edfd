// ABOUTME: Warmup library matched to the body region a session trains
// ABOUTME: Light cardio followed by dynamic drills, with an extra activation drill for beginners
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use evo_core::models::{BodyRegion, ExperienceLevel, Warmup, WarmupExercise};

/// (name, seconds, instructions)
type Drill = (&'static str, u32, &'static str);

const LIGHT_CARDIO: Drill = (
    "Cardio leve",
    300,
    "Esteira, bicicleta ou polichinelos em ritmo confortável para elevar a frequência cardíaca",
);

const UPPER_BODY_DRILLS: &[Drill] = &[
    ("Rotação de braços", 60, "Círculos amplos para frente e para trás, 15 de cada"),
    ("Afastamento com elástico", 60, "Puxe o elástico até o peito mantendo os braços estendidos"),
    ("Rotação de ombros", 60, "Eleve e gire os ombros lentamente, 10 repetições em cada sentido"),
];

const LOWER_BODY_DRILLS: &[Drill] = &[
    ("Círculos de quadril", 60, "Mãos na cintura, círculos lentos em ambos os sentidos"),
    ("Balanço de pernas", 60, "Apoie-se numa parede e balance cada perna para frente e para trás"),
    ("Agachamento com peso corporal", 60, "Desça controlando o movimento, 15 repetições"),
];

const FULL_BODY_DRILLS: &[Drill] = &[
    ("Rotação de braços", 60, "Círculos amplos para frente e para trás, 15 de cada"),
    ("Círculos de quadril", 60, "Mãos na cintura, círculos lentos em ambos os sentidos"),
    ("Inchworm", 60, "Caminhe com as mãos até a prancha e volte, 6 repetições"),
    ("Agachamento com peso corporal", 60, "Desça controlando o movimento, 15 repetições"),
];

const fn beginner_activation(region: BodyRegion) -> Drill {
    match region {
        BodyRegion::UpperBody => (
            "Flexão na parede",
            60,
            "Mãos na parede na altura do peito, 12 repetições lentas",
        ),
        BodyRegion::LowerBody | BodyRegion::FullBody => (
            "Ponte de glúteo",
            60,
            "Deitado, eleve o quadril contraindo os glúteos, 12 repetições",
        ),
    }
}

const fn drills_for(region: BodyRegion) -> &'static [Drill] {
    match region {
        BodyRegion::UpperBody => UPPER_BODY_DRILLS,
        BodyRegion::LowerBody => LOWER_BODY_DRILLS,
        BodyRegion::FullBody => FULL_BODY_DRILLS,
    }
}

fn to_exercise((name, duration_seconds, instructions): Drill) -> WarmupExercise {
    WarmupExercise {
        name: name.to_owned(),
        duration_seconds,
        instructions: instructions.to_owned(),
    }
}

/// Warmup for a session training `region`
#[must_use]
pub fn build_warmup(region: BodyRegion, experience: ExperienceLevel) -> Warmup {
    let mut drills = vec![LIGHT_CARDIO];
    drills.extend_from_slice(drills_for(region));
    if experience == ExperienceLevel::Beginner {
        drills.push(beginner_activation(region));
    }

    let total_seconds: u32 = drills.iter().map(|(_, seconds, _)| seconds).sum();
    Warmup {
        body_region: region,
        duration_minutes: total_seconds.div_ceil(60),
        exercises: drills.into_iter().map(to_exercise).collect(),
    }
}
