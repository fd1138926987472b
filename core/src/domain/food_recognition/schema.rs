/// Instruction sent alongside every photo. It pins the response to the
/// confidence-annotated shape and spells out the decline shape.
pub const RECOGNITION_PROMPT: &str = r#"你是一个专业的营养分析助手。请分析这张图片中的食物，并只返回 JSON。

要求:
1. 识别图片中所有可见的食物
2. 估算每种食物的重量（克）
3. 计算每种食物的热量和三大营养素
4. 为每种食物以及每个营养数值给出 0-100 的置信度

返回格式（必须严格遵守）:
{
  "foods": [
    {
      "food_name": "食物名称",
      "confidence": 整体置信度(0-100),
      "estimated_weight_g": {"value": 估算重量, "confidence": 置信度(0-100)},
      "calories": {"value": 热量(大卡), "confidence": 置信度(0-100)},
      "protein_g": {"value": 蛋白质(克), "confidence": 置信度(0-100)},
      "carbs_g": {"value": 碳水化合物(克), "confidence": 置信度(0-100)},
      "fat_g": {"value": 脂肪(克), "confidence": 置信度(0-100)}
    }
  ],
  "total_calories": 总热量
}

置信度评估标准:
- 90-100: 非常确定，食物清晰可见
- 70-89: 较为确定，基本正确但可能有小误差
- 50-69: 中等确定，建议用户确认
- 0-49: 不确定，强烈建议用户检查

如果图片模糊或无法识别食物，返回:
{
  "error": "无法识别，请重新拍照",
  "suggestion": "建议: 靠近一些，确保光线充足"
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_field() {
        for key in [
            "\"foods\"",
            "\"food_name\"",
            "\"confidence\"",
            "\"estimated_weight_g\"",
            "\"calories\"",
            "\"protein_g\"",
            "\"carbs_g\"",
            "\"fat_g\"",
            "\"total_calories\"",
            "\"error\"",
            "\"suggestion\"",
        ] {
            assert!(RECOGNITION_PROMPT.contains(key), "prompt is missing {key}");
        }
    }

    #[test]
    fn test_prompt_carries_confidence_bands() {
        for band in ["90-100", "70-89", "50-69", "0-49"] {
            assert!(RECOGNITION_PROMPT.contains(band));
        }
    }
}
