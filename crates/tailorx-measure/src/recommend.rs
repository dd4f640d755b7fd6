//! Style recommendations per (gender, body type).

use tailorx_core::Gender;

use crate::body_type::BodyType;

/// Returned for pairs that have no dedicated advice.
pub const DEFAULT_RECOMMENDATIONS: &[&str] = &[
    "Prendas versátiles y cómodas",
    "Poleras de ajuste regular",
    "Pantalones de corte clásico",
];

const FEMALE_HOURGLASS: &[&str] = &[
    "Poleras ajustadas que marquen la cintura",
    "Escotes en V para alargar el torso",
    "Pantalones de tiro medio con corte recto",
    "Jeans bootcut para equilibrar silueta",
];

const FEMALE_PEAR: &[&str] = &[
    "Poleras con detalles en hombros",
    "Escotes asimétricos para equilibrio",
    "Pantalones bootcut para equilibrar",
    "Evitar poleras ajustadas en cadera",
];

const FEMALE_INVERTED_TRIANGLE: &[&str] = &[
    "Poleras con escotes en V",
    "Evitar hombreras y mangas voluminosas",
    "Pantalones rectos o acampanados",
    "Añadir volumen en parte inferior",
];

const FEMALE_RECTANGLE: &[&str] = &[
    "Poleras que creen ilusión de curvas",
    "Cinturones para definir cintura",
    "Pantalones de tiro alto",
    "Detalles asimétricos en poleras",
];

const MALE_ATHLETIC: &[&str] = &[
    "Poleras semi-ajustadas",
    "Mostrar estructura atlética",
    "Pantalones de corte recto o slim",
    "Evitar poleras demasiado holgadas",
];

const MALE_TRAPEZOID: &[&str] = &[
    "Casi cualquier estilo de polera funciona",
    "Prendas semi-ajustadas ideales",
    "Pantalones de corte regular o slim",
    "Versatilidad en estilos",
];

const MALE_RECTANGLE: &[&str] = &[
    "Poleras que creen estructura",
    "Camisas con detalles verticales",
    "Pantalones de corte regular",
    "Evitar poleras demasiado rectas",
];

const MALE_TRIANGLE: &[&str] = &[
    "Poleras que añadan volumen superior",
    "Hombreras ligeras en chaquetas",
    "Pantalones rectos o ligeramente holgados",
    "Evitar pantalones ajustados en cadera",
];

/// Ordered advice for a subject. Never empty.
pub fn recommend(body_type: BodyType, gender: Gender) -> &'static [&'static str] {
    match (gender, body_type) {
        (Gender::Female, BodyType::Hourglass) => FEMALE_HOURGLASS,
        (Gender::Female, BodyType::Pear) => FEMALE_PEAR,
        (Gender::Female, BodyType::InvertedTriangle) => FEMALE_INVERTED_TRIANGLE,
        (Gender::Female, BodyType::Rectangle) => FEMALE_RECTANGLE,
        (Gender::Male, BodyType::AthleticInvertedTriangle) => MALE_ATHLETIC,
        (Gender::Male, BodyType::Trapezoid) => MALE_TRAPEZOID,
        (Gender::Male, BodyType::Rectangle) => MALE_RECTANGLE,
        (Gender::Male, BodyType::Triangle) => MALE_TRIANGLE,
        _ => DEFAULT_RECOMMENDATIONS,
    }
}
