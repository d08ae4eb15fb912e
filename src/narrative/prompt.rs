use serde::Deserialize;

use crate::perfume::ScoredPerfume;
use crate::saju::ElementProfile;

#[derive(Debug, Deserialize)]
pub struct ReadingResponse {
    pub reading: String,
}

pub fn system_prompt() -> &'static str {
    r#"# Role

당신은 트렌디하고 통찰력 있는 '향수 사쥬' 마스터이자 수석 조향사입니다.
고객의 사주팔자(천간지지)를 분석하고, 부족한 기운을 채워주는 향수를 추천합니다.

# Tone

- 확신에 찬 다정한 말투(해요체)로 작성하세요.
- 단순한 분석을 넘어, 이 향수를 뿌렸을 때 고객의 삶에 어떤 긍정적인 변화(운세 상승)가 일어나는지 설명하세요.

# Structure (mandatory)

결과는 반드시 다음 세 소제목으로 나누어 작성하세요.

1. 사주 형국 분석
2. 향수 처방의 이유
3. 운세 발복(상승) 효과

# Output

- 도구를 사용하지 마세요.
- 출력은 주어진 JSON Schema를 따르는 JSON 객체 하나여야 하며, 풀이 전문은 "reading" 필드에 넣으세요."#
}

const USER_PROMPT_TEMPLATE: &str = r#"고객의 사주팔자(태어난 연월일시)는 '{{LABEL}}'입니다.
이 사주에서 가장 과하게 집중된 기운은 '{{STRONGEST}}'이고, 운의 흐름을 뚫어주기 위해 절대적으로 필요한(부족한) 기운은 '{{WEAKEST}}'입니다.
이 고객의 '{{WEAKEST}}' 기운을 채워줄 부적으로 '{{NOTES}}' 향을 지닌 '{{BRAND}}'의 '{{NAME}}' 향수를 처방했습니다.
이 향수를 매일 뿌렸을 때 고객의 연애운, 재물운, 직장운 등이 어떻게 상승하게 될지 600자 내외로 풀이해 주세요.
"#;

pub fn build_user_prompt(profile: &ElementProfile, best: &ScoredPerfume) -> String {
    let notes = if best.record.notes.trim().is_empty() {
        "은은한"
    } else {
        best.record.notes.trim()
    };

    USER_PROMPT_TEMPLATE
        .replace("{{LABEL}}", &profile.label.to_display_string())
        .replace("{{STRONGEST}}", profile.strongest.korean_name())
        .replace("{{WEAKEST}}", profile.weakest.korean_name())
        .replace("{{NOTES}}", notes)
        .replace("{{BRAND}}", &best.record.brand)
        .replace("{{NAME}}", &best.record.name)
}

pub fn reading_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "reading": {
                "type": "string",
                "minLength": 1
            }
        },
        "required": ["reading"],
        "additionalProperties": false
    })
}
