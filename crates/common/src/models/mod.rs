/// 共享数据模型
///
/// 定义负载均值记录以及本地文本行的解析结果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 负载均值（1/5/15 分钟）
///
/// 字段始终有定义，默认全为零。采集失败时字段保留原值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl LoadAvg {
    pub fn new(one: f64, five: f64, fifteen: f64) -> Self {
        Self { one, five, fifteen }
    }

    /// 三个字段是否都为零
    pub fn is_zero(&self) -> bool {
        self.one == 0.0 && self.five == 0.0 && self.fifteen == 0.0
    }

    /// 只写入解析成功的字段，其余字段保持不变
    pub fn apply(&mut self, fields: &LoadAvgFields) {
        let [one, five, fifteen] = fields.values;
        if let Some(v) = one {
            self.one = v;
        }
        if let Some(v) = five {
            self.five = v;
        }
        if let Some(v) = fifteen {
            self.fifteen = v;
        }
    }
}

impl fmt::Display for LoadAvg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load average: {:.2}, {:.2}, {:.2}",
            self.one, self.five, self.fifteen
        )
    }
}

/// 单行文本的逐字段解析结果
///
/// 每个字段独立解析，缺失或无法解析的字段为 `None`。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAvgFields {
    pub values: [Option<f64>; 3],
}

impl LoadAvgFields {
    /// 按空白切分，解析前三个字段，忽略其余字段
    pub fn parse(line: &str) -> Self {
        let mut values = [None; 3];
        for (slot, field) in values.iter_mut().zip(line.split_whitespace()) {
            *slot = field.parse::<f64>().ok();
        }
        Self { values }
    }

    /// 解析失败或缺失的字段数
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}
