//! Static farm dashboard data.
//!
//! Weather, eco-score, irrigation history and market prices are fixed sample values
//! until real sensor and market feeds exist. Only the soil-moisture alert rule is logic.

use serde::Serialize;

/// Soil moisture percentage below which the dashboard raises an irrigation alert
pub const LOW_MOISTURE_THRESHOLD: f64 = 40.0;

/// Conditions right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    /// Degrees Celsius
    pub temp: i32,
    /// Short summary in Indonesian
    pub description: &'static str,
    /// Icon name for the client
    pub icon: &'static str,
    /// Relative humidity in percent
    pub humidity: i32,
    /// Millimetres today
    pub rainfall: i32,
}

/// One day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// Short day name, e.g. "Sen"
    pub day: &'static str,
    /// Degrees Celsius
    pub temp: i32,
    /// Icon name for the client
    pub icon: &'static str,
}

/// Current weather plus the coming days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Conditions right now
    pub current: CurrentWeather,
    /// Upcoming days in order
    pub forecast: Vec<ForecastDay>,
}

/// Sustainability score breakdown, each component 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScore {
    /// Overall score
    pub total: u8,
    /// Water use per unit of yield
    pub water_efficiency: u8,
    /// Fertilizer dosage relative to need
    pub fertilizer_use: u8,
    /// Yield per hectare
    pub productivity: u8,
    /// Handling of crop waste
    pub waste_management: u8,
}

impl EcoScore {
    /// The lowest-scoring component, used to pick the improvement tip.
    #[must_use]
    pub fn weakest_area(&self) -> &'static str {
        [
            ("water efficiency", self.water_efficiency),
            ("fertilizer use", self.fertilizer_use),
            ("productivity", self.productivity),
            ("waste management", self.waste_management),
        ]
        .into_iter()
        .min_by_key(|(_, score)| *score)
        .map_or("water efficiency", |(name, _)| name)
    }
}

/// One past irrigation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationLog {
    /// Display date
    pub date: &'static str,
    /// Local start time
    pub start_time: &'static str,
    /// Display duration, e.g. "30 menit"
    pub duration: &'static str,
    /// Litres
    pub volume: u32,
}

/// Yield estimate and input recommendation shown to PRO farmers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPrediction {
    /// Crop the prediction is for
    pub commodity: &'static str,
    /// Estimated yield in tons per hectare
    pub estimated_yield: f64,
    /// Model accuracy in percent
    pub accuracy: u8,
    /// Fertilizer advice for the current season
    pub recommendation: &'static str,
}

/// Detailed eco-score with an improvement tip and the community benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScoreReport {
    /// Score breakdown
    pub score: EcoScore,
    /// Lowest-scoring component
    pub weakest_area: &'static str,
    /// Advice for improving the weakest area
    pub tip: &'static str,
    /// Average total eco-score across the community
    pub community_average: u8,
}

/// Monthly market price point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketPrice {
    /// Short month name
    pub month: &'static str,
    /// Rupiah per kg of rice
    pub price: u32,
}

/// Current weather and a short forecast for the farm.
#[must_use]
pub fn weather() -> WeatherReport {
    WeatherReport {
        current: CurrentWeather {
            temp: 31,
            description: "Cerah Berawan",
            icon: "cloud",
            humidity: 75,
            rainfall: 0,
        },
        forecast: vec![
            ForecastDay {
                day: "Besok",
                temp: 32,
                icon: "sun",
            },
            ForecastDay {
                day: "Lusa",
                temp: 30,
                icon: "cloud",
            },
            ForecastDay {
                day: "Jumat",
                temp: 28,
                icon: "rain",
            },
        ],
    }
}

/// The farm's current eco-score.
#[must_use]
pub const fn eco_score() -> EcoScore {
    EcoScore {
        total: 78,
        water_efficiency: 65,
        fertilizer_use: 85,
        productivity: 80,
        waste_management: 90,
    }
}

/// Daily improvement tip for the given eco-score area.
#[must_use]
pub fn improvement_tip(area: &str) -> &'static str {
    match area {
        "fertilizer use" => {
            "Penggunaan pupuk kimia cukup tinggi. Coba ganti sebagian dengan pupuk kompos."
        }
        "productivity" => {
            "Produktivitas lahan bisa ditingkatkan dengan rotasi tanaman dan benih unggul."
        }
        "waste management" => {
            "Olah sisa panen menjadi kompos atau pakan ternak daripada dibakar."
        }
        _ => {
            "Skor efisiensi air tergolong boros. Coba tambahkan mulsa jerami untuk mengurangi penguapan."
        }
    }
}

/// The eco-score with its weakest area, matching tip, and community average.
#[must_use]
pub fn eco_score_report() -> EcoScoreReport {
    let score = eco_score();
    let weakest_area = score.weakest_area();
    EcoScoreReport {
        score,
        weakest_area,
        tip: improvement_tip(weakest_area),
        community_average: 75,
    }
}

/// Yield estimate for the current rice season.
#[must_use]
pub const fn harvest_prediction() -> HarvestPrediction {
    HarvestPrediction {
        commodity: "Padi",
        estimated_yield: 4.5,
        accuracy: 85,
        recommendation: "Untuk mencapai hasil panen 5 ton/ha, disarankan tambah 20 kg pupuk organik NPK per hektar.",
    }
}

/// Recent irrigation runs, newest first.
#[must_use]
pub fn irrigation_logs() -> Vec<IrrigationLog> {
    vec![
        IrrigationLog {
            date: "2024-07-20",
            start_time: "06:00",
            duration: "30 menit",
            volume: 500,
        },
        IrrigationLog {
            date: "2024-07-18",
            start_time: "06:15",
            duration: "25 menit",
            volume: 450,
        },
        IrrigationLog {
            date: "2024-07-16",
            start_time: "05:50",
            duration: "35 menit",
            volume: 550,
        },
        IrrigationLog {
            date: "2024-07-14",
            start_time: "06:00",
            duration: "30 menit",
            volume: 500,
        },
    ]
}

/// Monthly rice prices, January through July.
#[must_use]
pub fn market_prices() -> Vec<MarketPrice> {
    [
        ("Jan", 9500),
        ("Feb", 9800),
        ("Mar", 9750),
        ("Apr", 10200),
        ("Mei", 10500),
        ("Jun", 10300),
        ("Jul", 10800),
    ]
    .into_iter()
    .map(|(month, price)| MarketPrice { month, price })
    .collect()
}

/// Whether a soil-moisture reading should trigger the irrigation alert.
#[must_use]
pub fn is_moisture_low(moisture_percent: f64) -> bool {
    moisture_percent < LOW_MOISTURE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moisture_threshold() {
        assert!(is_moisture_low(38.0));
        assert!(is_moisture_low(39.9));
        assert!(!is_moisture_low(40.0));
        assert!(!is_moisture_low(55.0));
    }

    #[test]
    fn test_eco_score_report_uses_weakest_area_tip() {
        let report = eco_score_report();
        assert_eq!(report.score, eco_score());
        assert_eq!(report.weakest_area, "water efficiency");
        assert!(report.tip.contains("mulsa"));
        assert_eq!(report.community_average, 75);
        assert!(improvement_tip("waste management").contains("kompos"));
    }

    #[test]
    fn test_eco_score_weakest_area() {
        assert_eq!(eco_score().weakest_area(), "water efficiency");
        let balanced = EcoScore {
            total: 70,
            water_efficiency: 90,
            fertilizer_use: 40,
            productivity: 80,
            waste_management: 60,
        };
        assert_eq!(balanced.weakest_area(), "fertilizer use");
    }

    #[test]
    fn test_market_prices_cover_seven_months() {
        let prices = market_prices();
        assert_eq!(prices.len(), 7);
        assert_eq!(prices.first().map(|p| p.month), Some("Jan"));
        assert_eq!(prices.last().map(|p| p.price), Some(10800));
    }

    #[test]
    fn test_weather_serializes() {
        let json = serde_json::to_value(weather()).unwrap_or_default();
        assert_eq!(json["current"]["temp"], 31);
        assert_eq!(json["forecast"].as_array().map(Vec::len), Some(3));
    }
}
