/// The four fixed waste categories. The set is closed: the classifier only
/// ever scores these four candidates, so every result carries a valid
/// category by construction and no string lookup can miss at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dry,
    Wet,
    EWaste,
    Hazardous,
}

/// Static per-category dustbin record, fixed at compile time.
#[derive(Debug, Clone, Copy)]
pub struct DustbinInfo {
    pub color: &'static str,
    pub hindi: &'static str,
    pub bin: &'static str,
    pub examples: &'static str,
}

impl Category {
    /// Candidate order fed to the classifier. Classifier scores are indexed
    /// by position in this array.
    pub const ALL: [Category; 4] = [
        Category::Dry,
        Category::Wet,
        Category::EWaste,
        Category::Hazardous,
    ];

    /// Short category code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Dry => "dry",
            Category::Wet => "wet",
            Category::EWaste => "e-waste",
            Category::Hazardous => "hazardous",
        }
    }

    /// Long natural-language description used as the zero-shot candidate
    /// label for this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Dry => {
                "dry recyclable waste such as plastic bottles paper cardboard metal cans glass containers"
            }
            Category::Wet => {
                "wet organic biodegradable waste such as food scraps fruit peels vegetable waste leaves"
            }
            Category::EWaste => {
                "electronic waste such as mobile phones laptops computers batteries chargers cables"
            }
            Category::Hazardous => {
                "hazardous waste such as medicines chemicals light bulbs batteries syringes"
            }
        }
    }

    /// Reverse lookup from a candidate description. Only the four known
    /// descriptions map to a category; callers must treat `None` as a
    /// contract violation, never as a default.
    pub fn from_description(description: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.description() == description)
    }

    pub fn dustbin(&self) -> &'static DustbinInfo {
        match self {
            Category::Dry => &DustbinInfo {
                color: "🔵 BLUE",
                hindi: "सूखा कचरा",
                bin: "Blue Dustbin",
                examples: "Plastic bottles, paper, cardboard, glass",
            },
            Category::Wet => &DustbinInfo {
                color: "🟢 GREEN",
                hindi: "गीला कचरा",
                bin: "Green Dustbin",
                examples: "Food waste, fruit peels, vegetables, leaves",
            },
            Category::EWaste => &DustbinInfo {
                color: "⚫ BLACK/GREY",
                hindi: "इलेक्ट्रॉनिक कचरा",
                bin: "E-waste Collection Center",
                examples: "Phones, laptops, batteries, chargers",
            },
            Category::Hazardous => &DustbinInfo {
                color: "🔴 RED",
                hindi: "खतरनाक कचरा",
                bin: "Hazardous Waste Bin",
                examples: "Medicines, chemicals, bulbs, batteries",
            },
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One ranked classification result, valid for a single request.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub category: Category,
    pub score: f32,
}
