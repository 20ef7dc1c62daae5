//! Built-in question templates and cultural-context phrases.
//!
//! These tables make the service useful without any external config. A TOML file can
//! add more entries at startup (see `config.rs`), but nothing here changes afterwards.

use std::collections::HashMap;

use crate::domain::QuestionTemplate;

pub const GENERAL_BUCKET: &str = "general";

struct TemplateDef {
  topic: &'static str,
  prompt: &'static str,
  options: [&'static str; 4],
  answer: &'static str,
  explanation: &'static str,
}

struct ContextDef {
  country: &'static str,
  topic: &'static str,
  phrases: &'static [&'static str],
}

macro_rules! tpl {
  ($topic:expr, $prompt:expr, [$a:expr, $b:expr, $c:expr, $d:expr], $answer:expr, $expl:expr) => {
    TemplateDef {
      topic: $topic,
      prompt: $prompt,
      options: [$a, $b, $c, $d],
      answer: $answer,
      explanation: $expl,
    }
  };
}

macro_rules! ctx {
  ($country:expr, $topic:expr, [$($p:expr),+ $(,)?]) => {
    ContextDef { country: $country, topic: $topic, phrases: &[$($p),+] }
  };
}

const TEMPLATES: &[TemplateDef] = &[
  // water-cycle
  tpl!("water-cycle", "What process turns liquid water from rivers and seas into water vapour?",
    ["Evaporation", "Condensation", "Precipitation", "Infiltration"], "Evaporation",
    "Heat from the sun makes surface water evaporate and rise as vapour."),
  tpl!("water-cycle", "What forms when water vapour cools high in the atmosphere?",
    ["Clouds", "Rivers", "Groundwater", "Sea salt"], "Clouds",
    "Cooling vapour condenses into tiny droplets that gather as clouds."),
  tpl!("water-cycle", "What do we call rain, snow or hail falling from clouds?",
    ["Precipitation", "Transpiration", "Runoff", "Sublimation"], "Precipitation",
    "Any water falling from clouds to the ground is precipitation."),
  tpl!("water-cycle", "How do plants release water vapour into the air?",
    ["Transpiration", "Erosion", "Photosynthesis only", "Condensation"], "Transpiration",
    "Plants lose water through small pores in their leaves, a process called transpiration."),
  tpl!("water-cycle", "Where does most rainwater that does not soak into the ground go?",
    ["It flows as runoff into rivers and the sea", "It turns into rock", "It stays in the clouds", "It disappears completely"],
    "It flows as runoff into rivers and the sea",
    "Surface runoff carries water downhill into streams, rivers and eventually the sea."),
  tpl!("water-cycle", "Why does Southeast Asia receive heavy rain during the monsoon season?",
    ["Moist winds blow in from warm oceans", "The sun stops shining", "Mountains create water", "Rivers flow backwards"],
    "Moist winds blow in from warm oceans",
    "Seasonal monsoon winds carry moisture from the warm Indian and Pacific Oceans over land."),
  tpl!("water-cycle", "What is the name for water stored underground in soil and rock?",
    ["Groundwater", "Cloud water", "Sea spray", "Dew"], "Groundwater",
    "Water that infiltrates the soil collects in aquifers as groundwater."),

  // sea-history
  tpl!("sea-history", "Which empire, centred in Sumatra, controlled trade through the Strait of Malacca from the 7th century?",
    ["Srivijaya", "Majapahit", "Khmer Empire", "Ayutthaya"], "Srivijaya",
    "Srivijaya grew rich by controlling maritime trade routes between India and China."),
  tpl!("sea-history", "Which temple complex was built by the Khmer Empire?",
    ["Angkor Wat", "Borobudur", "Shwedagon Pagoda", "Wat Arun"], "Angkor Wat",
    "Angkor Wat was built in the 12th century under King Suryavarman II."),
  tpl!("sea-history", "In which year was ASEAN founded?",
    ["1967", "1945", "1975", "1999"], "1967",
    "ASEAN was founded on 8 August 1967 with the Bangkok Declaration."),
  tpl!("sea-history", "Which Javanese empire reached its peak under Hayam Wuruk and Gajah Mada?",
    ["Majapahit", "Srivijaya", "Champa", "Pagan"], "Majapahit",
    "Majapahit dominated much of the archipelago in the 14th century."),
  tpl!("sea-history", "Which country in Southeast Asia was never colonised by a European power?",
    ["Thailand", "Vietnam", "Indonesia", "Philippines"], "Thailand",
    "Siam (Thailand) stayed independent by balancing British and French interests."),
  tpl!("sea-history", "Which port city became a major trading hub after its founding as a sultanate around 1400?",
    ["Malacca", "Hanoi", "Yangon", "Cebu"], "Malacca",
    "The Malacca Sultanate controlled the strait and attracted traders from across Asia."),

  // sea-culture
  tpl!("sea-culture", "Which festival marks the Thai New Year with water splashing?",
    ["Songkran", "Tet", "Hari Raya", "Sinulog"], "Songkran",
    "Songkran is celebrated in April; splashing water symbolises cleansing and renewal."),
  tpl!("sea-culture", "What is the traditional wax-resist dyed cloth of Indonesia and Malaysia?",
    ["Batik", "Silk brocade", "Ikat only", "Tapa"], "Batik",
    "Batik uses wax to block dye, creating detailed patterns; UNESCO recognised it in 2009."),
  tpl!("sea-culture", "What is Tet in Vietnam?",
    ["The Lunar New Year festival", "A rice dish", "A mountain range", "A traditional boat"], "The Lunar New Year festival",
    "Tet Nguyen Dan is the most important celebration of the Vietnamese year."),
  tpl!("sea-culture", "Which shadow puppet theatre tradition comes from Java and Bali?",
    ["Wayang kulit", "Kabuki", "Mua roi nuoc", "Khon"], "Wayang kulit",
    "Wayang kulit uses leather puppets and a gamelan orchestra to tell epic stories."),
  tpl!("sea-culture", "What does the Filipino value of 'bayanihan' describe?",
    ["Community spirit and helping one another", "A harvest dance", "A type of boat", "A fishing method"],
    "Community spirit and helping one another",
    "Bayanihan is the tradition of neighbours working together, once carrying a whole house."),
  tpl!("sea-culture", "Which dish of rice cooked in coconut milk is often called Malaysia's national dish?",
    ["Nasi lemak", "Pho", "Adobo", "Som tam"], "Nasi lemak",
    "Nasi lemak is rice cooked in coconut milk and pandan, served with sambal."),

  // sea-geography
  tpl!("sea-geography", "Which is the longest river in Southeast Asia?",
    ["Mekong", "Chao Phraya", "Irrawaddy", "Red River"], "Mekong",
    "The Mekong flows about 4,900 km through six countries to the South China Sea."),
  tpl!("sea-geography", "Which country has the most islands in Southeast Asia?",
    ["Indonesia", "Philippines", "Malaysia", "Thailand"], "Indonesia",
    "Indonesia has more than 17,000 islands."),
  tpl!("sea-geography", "Which narrow waterway separates the Malay Peninsula from Sumatra?",
    ["Strait of Malacca", "Sunda Strait", "Gulf of Thailand", "Luzon Strait"], "Strait of Malacca",
    "The Strait of Malacca is one of the busiest shipping lanes in the world."),
  tpl!("sea-geography", "What is the highest mountain in Southeast Asia?",
    ["Hkakabo Razi", "Mount Kinabalu", "Mount Apo", "Fansipan"], "Hkakabo Razi",
    "Hkakabo Razi in northern Myanmar rises about 5,881 m."),
  tpl!("sea-geography", "Which large lake in Cambodia changes size with the seasons?",
    ["Tonle Sap", "Lake Toba", "Inle Lake", "Lake Lanao"], "Tonle Sap",
    "In the wet season the Tonle Sap river reverses and the lake grows several times larger."),
  tpl!("sea-geography", "Why do many Southeast Asian countries experience volcanoes and earthquakes?",
    ["They lie on the Pacific Ring of Fire", "They are near the North Pole", "They have many deserts", "They are far from any ocean"],
    "They lie on the Pacific Ring of Fire",
    "Tectonic plates meet around the Pacific, producing volcanoes and earthquakes."),
];

const CONTEXTS: &[ContextDef] = &[
  ctx!("philippines", "water-cycle", ["rice terraces", "typhoon season", "Pasig River", "Manila Bay"]),
  ctx!("indonesia", "water-cycle", ["Lake Toba", "Citarum River", "rainy season in Java", "rice paddies of Bali"]),
  ctx!("thailand", "water-cycle", ["Chao Phraya River", "monsoon rains", "floating markets", "Songkran water splashing"]),
  ctx!("vietnam", "water-cycle", ["Mekong Delta", "Ha Long Bay", "terraced fields of Sapa", "Red River"]),
  ctx!("malaysia", "water-cycle", ["Cameron Highlands tea slopes", "Klang River", "Borneo rainforest", "northeast monsoon"]),
  ctx!("singapore", "water-cycle", ["Marina Reservoir", "NEWater", "afternoon thunderstorms", "Bukit Timah forest"]),
  ctx!(GENERAL_BUCKET, "water-cycle", ["monsoon rains", "tropical rainforest", "rice paddies", "Mekong River"]),

  ctx!("philippines", "sea-history", ["Lapu-Lapu at Mactan", "Intramuros", "the galleon trade", "Rizal Park"]),
  ctx!("indonesia", "sea-history", ["Borobudur", "Majapahit court", "spice trade of Maluku", "Batavia"]),
  ctx!("thailand", "sea-history", ["Ayutthaya", "Sukhothai", "King Ramkhamhaeng", "the Grand Palace"]),
  ctx!("vietnam", "sea-history", ["Hue Imperial City", "Hoi An trading port", "the Trung sisters", "Van Mieu temple"]),
  ctx!("malaysia", "sea-history", ["Malacca Sultanate", "A Famosa fort", "Straits Settlements", "Kedah Tua"]),
  ctx!("singapore", "sea-history", ["Temasek", "Fort Canning", "the Singapore River trade", "Raffles' landing site"]),
  ctx!(GENERAL_BUCKET, "sea-history", ["Angkor Wat", "the Strait of Malacca", "ancient spice routes", "ASEAN founding"]),

  ctx!("philippines", "sea-culture", ["Sinulog festival", "bayanihan", "jeepney", "adobo"]),
  ctx!("indonesia", "sea-culture", ["batik", "gamelan", "wayang kulit", "rendang"]),
  ctx!("thailand", "sea-culture", ["Songkran", "Loy Krathong", "wai greeting", "pad thai"]),
  ctx!("vietnam", "sea-culture", ["Tet", "ao dai", "water puppetry", "pho"]),
  ctx!("malaysia", "sea-culture", ["Hari Raya", "nasi lemak", "wau kite", "open house tradition"]),
  ctx!("singapore", "sea-culture", ["hawker centres", "Chinese New Year in Chinatown", "Deepavali in Little India", "Singlish"]),
  ctx!(GENERAL_BUCKET, "sea-culture", ["harvest festivals", "shared family meals", "traditional textiles", "respect for elders"]),

  ctx!("philippines", "sea-geography", ["Mayon Volcano", "Chocolate Hills", "Palawan", "Mindanao"]),
  ctx!("indonesia", "sea-geography", ["Krakatoa", "Komodo Island", "Sumatra", "Papua highlands"]),
  ctx!("thailand", "sea-geography", ["Doi Inthanon", "Andaman Sea", "Khorat Plateau", "Gulf of Thailand"]),
  ctx!("vietnam", "sea-geography", ["Fansipan", "Phong Nha caves", "Mekong Delta", "Annamite Range"]),
  ctx!("malaysia", "sea-geography", ["Mount Kinabalu", "Taman Negara", "Langkawi", "Strait of Malacca"]),
  ctx!("singapore", "sea-geography", ["Sentosa", "Bukit Timah Hill", "Johor Strait", "Pulau Ubin"]),
  ctx!(GENERAL_BUCKET, "sea-geography", ["Mekong River", "Pacific Ring of Fire", "South China Sea", "Indochina peninsula"]),
];

/// All built-in templates.
pub fn seed_templates() -> Vec<QuestionTemplate> {
  TEMPLATES
    .iter()
    .map(|t| QuestionTemplate {
      topic: t.topic.into(),
      prompt_text: t.prompt.into(),
      options: t.options.iter().map(|o| o.to_string()).collect(),
      correct_answer: t.answer.into(),
      explanation: t.explanation.into(),
    })
    .collect()
}

/// Cultural-context phrases keyed by (country bucket, topic).
pub fn seed_cultural_contexts() -> HashMap<(String, String), Vec<String>> {
  CONTEXTS
    .iter()
    .map(|c| {
      (
        (c.country.to_string(), c.topic.to_string()),
        c.phrases.iter().map(|p| p.to_string()).collect(),
      )
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn every_seed_template_is_valid() {
    for t in seed_templates() {
      t.validate().unwrap_or_else(|e| panic!("{}: {}", t.prompt_text, e));
    }
  }

  #[test]
  fn templates_are_unique_within_topic() {
    let mut seen = HashSet::new();
    for t in seed_templates() {
      assert!(seen.insert((t.topic.clone(), t.prompt_text.clone())), "duplicate: {}", t.prompt_text);
    }
  }

  #[test]
  fn every_topic_has_a_general_bucket() {
    let ctx = seed_cultural_contexts();
    for t in seed_templates() {
      let key = (GENERAL_BUCKET.to_string(), t.topic.clone());
      assert!(ctx.get(&key).is_some_and(|p| !p.is_empty()), "no general phrases for {}", t.topic);
    }
  }
}
