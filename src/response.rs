use serde_json::{Value, json};
use transit_catalogue_core::QueryAnswer;

const NOT_FOUND: &str = "not found";

pub fn answer_to_json(answer: &QueryAnswer) -> Value {
    match answer {
        QueryAnswer::NotFound { id } => json!({
            "request_id": id,
            "error_message": NOT_FOUND,
        }),
        QueryAnswer::StopInfo { id, buses } => json!({
            "request_id": id,
            "buses": buses,
        }),
        QueryAnswer::BusInfo { id, stats } => {
            let mut value = json!(stats);
            value["request_id"] = json!(id);
            value
        }
        QueryAnswer::MapInfo { id, map } => json!({
            "request_id": id,
            "map": map,
        }),
        QueryAnswer::RouteInfo {
            id,
            total_time,
            items,
        } => {
            let items: Vec<Value> = items
                .iter()
                .flat_map(|leg| {
                    [
                        json!({
                            "type": "Wait",
                            "stop_name": leg.stop_name,
                            "time": leg.wait_time,
                        }),
                        json!({
                            "type": "Bus",
                            "bus": leg.bus_name,
                            "span_count": leg.span_count,
                            "time": leg.ride_time,
                        }),
                    ]
                })
                .collect();
            json!({
                "request_id": id,
                "total_time": total_time,
                "items": items,
            })
        }
    }
}

pub fn answers_to_json(answers: &[QueryAnswer]) -> Value {
    Value::Array(answers.iter().map(answer_to_json).collect())
}
