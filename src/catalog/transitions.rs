//! # X 射线跃迁与吸收边数据库
//!
//! 提供各元素特征 X 射线跃迁能量、族内相对强度与电离吸收边能量。
//!
//! ## 数据来源
//! - 跃迁能量: Bearden, Rev. Mod. Phys. 39, 78 (1967)
//! - 吸收边能量: X-ray Data Booklet, LBNL
//! - 相对强度为族内归一的典型 EDS 值
//!
//! ## 依赖关系
//! - 被 `catalog/mod.rs` 调用
//! - 纯静态数据，无外部依赖

use std::collections::HashMap;
use std::sync::LazyLock;

/// 单条 X 射线跃迁
#[derive(Debug, Clone, Copy)]
pub struct TransitionData {
    /// Siegbahn 跃迁标记
    pub transition: &'static str,

    /// 跃迁能量 (eV)
    pub energy_ev: f64,

    /// 族内相对强度（非全局归一）
    pub fraction: f64,
}

/// 单个电离吸收边
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    /// 壳层标记
    pub subshell: &'static str,

    /// 吸收边能量 (eV)
    pub energy_ev: f64,
}

/// 特征 X 射线跃迁数据库，键为原子序数
pub static XRAY_TRANSITIONS: LazyLock<HashMap<u32, Vec<TransitionData>>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // 碳 (C)
    m.insert(
        6,
        vec![TransitionData { transition: "Ka1", energy_ev: 277.0, fraction: 1.0 }],
    );

    // 氮 (N)
    m.insert(
        7,
        vec![TransitionData { transition: "Ka1", energy_ev: 392.4, fraction: 1.0 }],
    );

    // 氧 (O)
    m.insert(
        8,
        vec![TransitionData { transition: "Ka1", energy_ev: 524.9, fraction: 1.0 }],
    );

    // 氟 (F)
    m.insert(
        9,
        vec![TransitionData { transition: "Ka1", energy_ev: 676.8, fraction: 1.0 }],
    );

    // 钠 (Na)
    m.insert(
        11,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 1040.98, fraction: 0.660 },
            TransitionData { transition: "Ka2", energy_ev: 1040.98, fraction: 0.330 },
            TransitionData { transition: "Kb1", energy_ev: 1071.1, fraction: 0.010 },
        ],
    );

    // 镁 (Mg)
    m.insert(
        12,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 1253.60, fraction: 0.654 },
            TransitionData { transition: "Ka2", energy_ev: 1253.44, fraction: 0.329 },
            TransitionData { transition: "Kb1", energy_ev: 1302.2, fraction: 0.017 },
        ],
    );

    // 铝 (Al)
    m.insert(
        13,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 1486.70, fraction: 0.650 },
            TransitionData { transition: "Ka2", energy_ev: 1486.27, fraction: 0.327 },
            TransitionData { transition: "Kb1", energy_ev: 1557.45, fraction: 0.023 },
            TransitionData { transition: "SKa1", energy_ev: 1496.4, fraction: 0.035 },
        ],
    );

    // 硅 (Si)
    m.insert(
        14,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 1739.98, fraction: 0.648 },
            TransitionData { transition: "Ka2", energy_ev: 1739.38, fraction: 0.326 },
            TransitionData { transition: "Kb1", energy_ev: 1835.94, fraction: 0.026 },
            TransitionData { transition: "SKa1", energy_ev: 1752.0, fraction: 0.040 },
        ],
    );

    // 磷 (P)
    m.insert(
        15,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 2013.7, fraction: 0.645 },
            TransitionData { transition: "Ka2", energy_ev: 2012.7, fraction: 0.325 },
            TransitionData { transition: "Kb1", energy_ev: 2139.1, fraction: 0.030 },
        ],
    );

    // 硫 (S)
    m.insert(
        16,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 2307.84, fraction: 0.640 },
            TransitionData { transition: "Ka2", energy_ev: 2306.64, fraction: 0.323 },
            TransitionData { transition: "Kb1", energy_ev: 2464.04, fraction: 0.037 },
        ],
    );

    // 氯 (Cl)
    m.insert(
        17,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 2622.39, fraction: 0.637 },
            TransitionData { transition: "Ka2", energy_ev: 2620.78, fraction: 0.321 },
            TransitionData { transition: "Kb1", energy_ev: 2815.6, fraction: 0.042 },
        ],
    );

    // 钾 (K)
    m.insert(
        19,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 3313.8, fraction: 0.630 },
            TransitionData { transition: "Ka2", energy_ev: 3311.1, fraction: 0.318 },
            TransitionData { transition: "Kb1", energy_ev: 3589.6, fraction: 0.052 },
        ],
    );

    // 钙 (Ca)
    m.insert(
        20,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 3691.68, fraction: 0.627 },
            TransitionData { transition: "Ka2", energy_ev: 3688.09, fraction: 0.316 },
            TransitionData { transition: "Kb1", energy_ev: 4012.7, fraction: 0.057 },
        ],
    );

    // 钛 (Ti)
    m.insert(
        22,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 4510.84, fraction: 0.622 },
            TransitionData { transition: "Ka2", energy_ev: 4504.86, fraction: 0.314 },
            TransitionData { transition: "Kb1", energy_ev: 4931.81, fraction: 0.064 },
            TransitionData { transition: "La1", energy_ev: 452.2, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 458.4, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 395.3, fraction: 0.06 },
        ],
    );

    // 铬 (Cr)
    m.insert(
        24,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 5414.72, fraction: 0.618 },
            TransitionData { transition: "Ka2", energy_ev: 5405.51, fraction: 0.312 },
            TransitionData { transition: "Kb1", energy_ev: 5946.71, fraction: 0.070 },
            TransitionData { transition: "La1", energy_ev: 572.8, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 582.8, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 500.3, fraction: 0.06 },
        ],
    );

    // 锰 (Mn)
    m.insert(
        25,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 5898.75, fraction: 0.616 },
            TransitionData { transition: "Ka2", energy_ev: 5887.65, fraction: 0.311 },
            TransitionData { transition: "Kb1", energy_ev: 6490.45, fraction: 0.073 },
            TransitionData { transition: "La1", energy_ev: 637.4, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 648.8, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 556.3, fraction: 0.06 },
        ],
    );

    // 铁 (Fe)
    m.insert(
        26,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 6403.84, fraction: 0.613 },
            TransitionData { transition: "Ka2", energy_ev: 6390.84, fraction: 0.310 },
            TransitionData { transition: "Kb1", energy_ev: 7057.98, fraction: 0.077 },
            TransitionData { transition: "La1", energy_ev: 705.0, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 718.5, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 615.2, fraction: 0.06 },
        ],
    );

    // 钴 (Co)
    m.insert(
        27,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 6930.32, fraction: 0.611 },
            TransitionData { transition: "Ka2", energy_ev: 6915.30, fraction: 0.309 },
            TransitionData { transition: "Kb1", energy_ev: 7649.43, fraction: 0.080 },
            TransitionData { transition: "La1", energy_ev: 776.2, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 791.4, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 677.8, fraction: 0.06 },
        ],
    );

    // 镍 (Ni)
    m.insert(
        28,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 7478.15, fraction: 0.609 },
            TransitionData { transition: "Ka2", energy_ev: 7460.89, fraction: 0.308 },
            TransitionData { transition: "Kb1", energy_ev: 8264.66, fraction: 0.083 },
            TransitionData { transition: "La1", energy_ev: 851.5, fraction: 0.70 },
            TransitionData { transition: "Lb1", energy_ev: 868.8, fraction: 0.24 },
            TransitionData { transition: "Ll", energy_ev: 742.7, fraction: 0.06 },
        ],
    );

    // 铜 (Cu)
    m.insert(
        29,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 8047.78, fraction: 0.607 },
            TransitionData { transition: "Ka2", energy_ev: 8027.83, fraction: 0.307 },
            TransitionData { transition: "Kb1", energy_ev: 8905.29, fraction: 0.086 },
            TransitionData { transition: "La1", energy_ev: 929.7, fraction: 0.68 },
            TransitionData { transition: "Lb1", energy_ev: 949.8, fraction: 0.26 },
            TransitionData { transition: "Ll", energy_ev: 811.1, fraction: 0.06 },
        ],
    );

    // 锌 (Zn)
    m.insert(
        30,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 8638.86, fraction: 0.605 },
            TransitionData { transition: "Ka2", energy_ev: 8615.78, fraction: 0.306 },
            TransitionData { transition: "Kb1", energy_ev: 9572.0, fraction: 0.089 },
            TransitionData { transition: "La1", energy_ev: 1011.7, fraction: 0.68 },
            TransitionData { transition: "Lb1", energy_ev: 1034.7, fraction: 0.26 },
            TransitionData { transition: "Ll", energy_ev: 884.0, fraction: 0.06 },
        ],
    );

    // 镓 (Ga)
    m.insert(
        31,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 9251.74, fraction: 0.603 },
            TransitionData { transition: "Ka2", energy_ev: 9224.82, fraction: 0.305 },
            TransitionData { transition: "Kb1", energy_ev: 10264.2, fraction: 0.092 },
            TransitionData { transition: "La1", energy_ev: 1097.92, fraction: 0.68 },
            TransitionData { transition: "Lb1", energy_ev: 1124.8, fraction: 0.26 },
            TransitionData { transition: "Ll", energy_ev: 957.2, fraction: 0.06 },
        ],
    );

    // 锗 (Ge)
    m.insert(
        32,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 9886.42, fraction: 0.601 },
            TransitionData { transition: "Ka2", energy_ev: 9855.32, fraction: 0.304 },
            TransitionData { transition: "Kb1", energy_ev: 10982.1, fraction: 0.095 },
            TransitionData { transition: "La1", energy_ev: 1188.00, fraction: 0.68 },
            TransitionData { transition: "Lb1", energy_ev: 1218.5, fraction: 0.26 },
            TransitionData { transition: "Ll", energy_ev: 1036.2, fraction: 0.06 },
        ],
    );

    // 锆 (Zr)
    m.insert(
        40,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 15775.1, fraction: 0.555 },
            TransitionData { transition: "Ka2", energy_ev: 15690.9, fraction: 0.288 },
            TransitionData { transition: "Kb1", energy_ev: 17667.8, fraction: 0.157 },
            TransitionData { transition: "La1", energy_ev: 2042.36, fraction: 0.535 },
            TransitionData { transition: "La2", energy_ev: 2039.9, fraction: 0.060 },
            TransitionData { transition: "Lb1", energy_ev: 2124.4, fraction: 0.280 },
            TransitionData { transition: "Lb2", energy_ev: 2219.4, fraction: 0.070 },
            TransitionData { transition: "Lg1", energy_ev: 2302.7, fraction: 0.025 },
            TransitionData { transition: "Ll", energy_ev: 1792.0, fraction: 0.030 },
        ],
    );

    // 钼 (Mo)
    m.insert(
        42,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 17479.34, fraction: 0.553 },
            TransitionData { transition: "Ka2", energy_ev: 17374.3, fraction: 0.287 },
            TransitionData { transition: "Kb1", energy_ev: 19608.3, fraction: 0.160 },
            TransitionData { transition: "La1", energy_ev: 2293.16, fraction: 0.535 },
            TransitionData { transition: "La2", energy_ev: 2289.85, fraction: 0.060 },
            TransitionData { transition: "Lb1", energy_ev: 2394.81, fraction: 0.280 },
            TransitionData { transition: "Lb2", energy_ev: 2518.3, fraction: 0.070 },
            TransitionData { transition: "Lg1", energy_ev: 2623.5, fraction: 0.025 },
            TransitionData { transition: "Ll", energy_ev: 1982.3, fraction: 0.030 },
        ],
    );

    // 银 (Ag)
    m.insert(
        47,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 22162.92, fraction: 0.550 },
            TransitionData { transition: "Ka2", energy_ev: 21990.3, fraction: 0.286 },
            TransitionData { transition: "Kb1", energy_ev: 24942.4, fraction: 0.164 },
            TransitionData { transition: "La1", energy_ev: 2984.31, fraction: 0.530 },
            TransitionData { transition: "La2", energy_ev: 2978.21, fraction: 0.060 },
            TransitionData { transition: "Lb1", energy_ev: 3150.94, fraction: 0.285 },
            TransitionData { transition: "Lb2", energy_ev: 3347.81, fraction: 0.070 },
            TransitionData { transition: "Lg1", energy_ev: 3519.59, fraction: 0.025 },
            TransitionData { transition: "Ll", energy_ev: 2633.7, fraction: 0.030 },
        ],
    );

    // 锡 (Sn)
    m.insert(
        50,
        vec![
            TransitionData { transition: "Ka1", energy_ev: 25271.3, fraction: 0.548 },
            TransitionData { transition: "Ka2", energy_ev: 25044.0, fraction: 0.285 },
            TransitionData { transition: "Kb1", energy_ev: 28486.0, fraction: 0.167 },
            TransitionData { transition: "La1", energy_ev: 3443.98, fraction: 0.530 },
            TransitionData { transition: "La2", energy_ev: 3435.42, fraction: 0.060 },
            TransitionData { transition: "Lb1", energy_ev: 3662.80, fraction: 0.285 },
            TransitionData { transition: "Lb2", energy_ev: 3904.86, fraction: 0.070 },
            TransitionData { transition: "Lg1", energy_ev: 4131.12, fraction: 0.025 },
            TransitionData { transition: "Ll", energy_ev: 3045.0, fraction: 0.030 },
        ],
    );

    // 金 (Au)
    m.insert(
        79,
        vec![
            TransitionData { transition: "La1", energy_ev: 9713.3, fraction: 0.500 },
            TransitionData { transition: "La2", energy_ev: 9628.0, fraction: 0.056 },
            TransitionData { transition: "Lb1", energy_ev: 11442.3, fraction: 0.300 },
            TransitionData { transition: "Lb2", energy_ev: 11584.7, fraction: 0.100 },
            TransitionData { transition: "Lg1", energy_ev: 13381.7, fraction: 0.030 },
            TransitionData { transition: "Ll", energy_ev: 8493.9, fraction: 0.014 },
            TransitionData { transition: "Ma1", energy_ev: 2122.9, fraction: 0.600 },
            TransitionData { transition: "Mb1", energy_ev: 2204.7, fraction: 0.340 },
            TransitionData { transition: "Mz1", energy_ev: 1648.0, fraction: 0.060 },
        ],
    );

    // 铅 (Pb)
    m.insert(
        82,
        vec![
            TransitionData { transition: "La1", energy_ev: 10551.5, fraction: 0.500 },
            TransitionData { transition: "La2", energy_ev: 10449.5, fraction: 0.056 },
            TransitionData { transition: "Lb1", energy_ev: 12613.7, fraction: 0.300 },
            TransitionData { transition: "Lb2", energy_ev: 12622.6, fraction: 0.100 },
            TransitionData { transition: "Lg1", energy_ev: 14764.4, fraction: 0.030 },
            TransitionData { transition: "Ll", energy_ev: 9184.5, fraction: 0.014 },
            TransitionData { transition: "Ma1", energy_ev: 2345.5, fraction: 0.600 },
            TransitionData { transition: "Mb1", energy_ev: 2442.6, fraction: 0.340 },
            TransitionData { transition: "Mz1", energy_ev: 1839.8, fraction: 0.060 },
        ],
    );

    m
});

/// 电离吸收边数据库，键为原子序数
pub static ABSORPTION_EDGES: LazyLock<HashMap<u32, Vec<EdgeData>>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // 碳 (C)
    m.insert(6, vec![EdgeData { subshell: "K", energy_ev: 284.2 }]);

    // 氮 (N)
    m.insert(7, vec![EdgeData { subshell: "K", energy_ev: 409.9 }]);

    // 氧 (O)
    m.insert(8, vec![EdgeData { subshell: "K", energy_ev: 543.1 }]);

    // 氟 (F)
    m.insert(9, vec![EdgeData { subshell: "K", energy_ev: 696.7 }]);

    // 钠 (Na)
    m.insert(11, vec![EdgeData { subshell: "K", energy_ev: 1070.8 }]);

    // 镁 (Mg)
    m.insert(12, vec![EdgeData { subshell: "K", energy_ev: 1303.0 }]);

    // 铝 (Al)
    m.insert(13, vec![EdgeData { subshell: "K", energy_ev: 1559.6 }]);

    // 硅 (Si)
    m.insert(14, vec![EdgeData { subshell: "K", energy_ev: 1839.0 }]);

    // 磷 (P)
    m.insert(15, vec![EdgeData { subshell: "K", energy_ev: 2145.5 }]);

    // 硫 (S)
    m.insert(16, vec![EdgeData { subshell: "K", energy_ev: 2472.0 }]);

    // 氯 (Cl)
    m.insert(17, vec![EdgeData { subshell: "K", energy_ev: 2822.4 }]);

    // 钾 (K)
    m.insert(19, vec![EdgeData { subshell: "K", energy_ev: 3608.4 }]);

    // 钙 (Ca)
    m.insert(20, vec![EdgeData { subshell: "K", energy_ev: 4038.5 }]);

    // 钛 (Ti)
    m.insert(
        22,
        vec![
            EdgeData { subshell: "K", energy_ev: 4966.0 },
            EdgeData { subshell: "L1", energy_ev: 560.9 },
            EdgeData { subshell: "L2", energy_ev: 460.2 },
            EdgeData { subshell: "L3", energy_ev: 453.8 },
        ],
    );

    // 铬 (Cr)
    m.insert(
        24,
        vec![
            EdgeData { subshell: "K", energy_ev: 5989.0 },
            EdgeData { subshell: "L1", energy_ev: 696.0 },
            EdgeData { subshell: "L2", energy_ev: 583.8 },
            EdgeData { subshell: "L3", energy_ev: 574.1 },
        ],
    );

    // 锰 (Mn)
    m.insert(
        25,
        vec![
            EdgeData { subshell: "K", energy_ev: 6539.0 },
            EdgeData { subshell: "L1", energy_ev: 769.1 },
            EdgeData { subshell: "L2", energy_ev: 649.9 },
            EdgeData { subshell: "L3", energy_ev: 638.7 },
        ],
    );

    // 铁 (Fe)
    m.insert(
        26,
        vec![
            EdgeData { subshell: "K", energy_ev: 7112.0 },
            EdgeData { subshell: "L1", energy_ev: 844.6 },
            EdgeData { subshell: "L2", energy_ev: 719.9 },
            EdgeData { subshell: "L3", energy_ev: 706.8 },
        ],
    );

    // 钴 (Co)
    m.insert(
        27,
        vec![
            EdgeData { subshell: "K", energy_ev: 7709.0 },
            EdgeData { subshell: "L1", energy_ev: 925.1 },
            EdgeData { subshell: "L2", energy_ev: 793.2 },
            EdgeData { subshell: "L3", energy_ev: 778.1 },
        ],
    );

    // 镍 (Ni)
    m.insert(
        28,
        vec![
            EdgeData { subshell: "K", energy_ev: 8333.0 },
            EdgeData { subshell: "L1", energy_ev: 1008.6 },
            EdgeData { subshell: "L2", energy_ev: 870.0 },
            EdgeData { subshell: "L3", energy_ev: 852.7 },
        ],
    );

    // 铜 (Cu)
    m.insert(
        29,
        vec![
            EdgeData { subshell: "K", energy_ev: 8979.0 },
            EdgeData { subshell: "L1", energy_ev: 1096.7 },
            EdgeData { subshell: "L2", energy_ev: 952.3 },
            EdgeData { subshell: "L3", energy_ev: 932.7 },
        ],
    );

    // 锌 (Zn)
    m.insert(
        30,
        vec![
            EdgeData { subshell: "K", energy_ev: 9659.0 },
            EdgeData { subshell: "L1", energy_ev: 1196.2 },
            EdgeData { subshell: "L2", energy_ev: 1044.9 },
            EdgeData { subshell: "L3", energy_ev: 1021.8 },
        ],
    );

    // 镓 (Ga)
    m.insert(
        31,
        vec![
            EdgeData { subshell: "K", energy_ev: 10367.0 },
            EdgeData { subshell: "L1", energy_ev: 1299.0 },
            EdgeData { subshell: "L2", energy_ev: 1143.2 },
            EdgeData { subshell: "L3", energy_ev: 1116.4 },
        ],
    );

    // 锗 (Ge)
    m.insert(
        32,
        vec![
            EdgeData { subshell: "K", energy_ev: 11103.0 },
            EdgeData { subshell: "L1", energy_ev: 1414.6 },
            EdgeData { subshell: "L2", energy_ev: 1248.1 },
            EdgeData { subshell: "L3", energy_ev: 1217.0 },
        ],
    );

    // 锆 (Zr)
    m.insert(
        40,
        vec![
            EdgeData { subshell: "K", energy_ev: 17998.0 },
            EdgeData { subshell: "L1", energy_ev: 2531.6 },
            EdgeData { subshell: "L2", energy_ev: 2306.7 },
            EdgeData { subshell: "L3", energy_ev: 2222.3 },
        ],
    );

    // 钼 (Mo)
    m.insert(
        42,
        vec![
            EdgeData { subshell: "K", energy_ev: 20000.0 },
            EdgeData { subshell: "L1", energy_ev: 2866.0 },
            EdgeData { subshell: "L2", energy_ev: 2625.1 },
            EdgeData { subshell: "L3", energy_ev: 2520.2 },
        ],
    );

    // 银 (Ag)
    m.insert(
        47,
        vec![
            EdgeData { subshell: "K", energy_ev: 25514.0 },
            EdgeData { subshell: "L1", energy_ev: 3805.8 },
            EdgeData { subshell: "L2", energy_ev: 3523.7 },
            EdgeData { subshell: "L3", energy_ev: 3351.0 },
        ],
    );

    // 锡 (Sn)
    m.insert(
        50,
        vec![
            EdgeData { subshell: "K", energy_ev: 29200.0 },
            EdgeData { subshell: "L1", energy_ev: 4464.7 },
            EdgeData { subshell: "L2", energy_ev: 4156.1 },
            EdgeData { subshell: "L3", energy_ev: 3928.8 },
        ],
    );

    // 金 (Au)
    m.insert(
        79,
        vec![
            EdgeData { subshell: "K", energy_ev: 80724.9 },
            EdgeData { subshell: "L1", energy_ev: 14352.8 },
            EdgeData { subshell: "L2", energy_ev: 13733.6 },
            EdgeData { subshell: "L3", energy_ev: 11918.7 },
            EdgeData { subshell: "M1", energy_ev: 3425.0 },
            EdgeData { subshell: "M2", energy_ev: 3148.0 },
            EdgeData { subshell: "M3", energy_ev: 2743.0 },
            EdgeData { subshell: "M4", energy_ev: 2291.0 },
            EdgeData { subshell: "M5", energy_ev: 2206.0 },
        ],
    );

    // 铅 (Pb)
    m.insert(
        82,
        vec![
            EdgeData { subshell: "K", energy_ev: 88004.5 },
            EdgeData { subshell: "L1", energy_ev: 15861.0 },
            EdgeData { subshell: "L2", energy_ev: 15200.0 },
            EdgeData { subshell: "L3", energy_ev: 13035.0 },
            EdgeData { subshell: "M1", energy_ev: 3851.0 },
            EdgeData { subshell: "M2", energy_ev: 3554.0 },
            EdgeData { subshell: "M3", energy_ev: 3066.0 },
            EdgeData { subshell: "M4", energy_ev: 2586.0 },
            EdgeData { subshell: "M5", energy_ev: 2484.0 },
        ],
    );

    m
});

/// 查询某元素的全部跃迁数据
pub fn transitions(atomic_number: u32) -> Option<&'static [TransitionData]> {
    XRAY_TRANSITIONS.get(&atomic_number).map(|v| v.as_slice())
}

/// 查询某元素的全部吸收边数据
pub fn edges(atomic_number: u32) -> Option<&'static [EdgeData]> {
    ABSORPTION_EDGES.get(&atomic_number).map(|v| v.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_transition_energies() {
        let si = transitions(14).unwrap();
        let ka1 = si.iter().find(|t| t.transition == "Ka1").unwrap();
        assert!((ka1.energy_ev - 1739.98).abs() < 1e-6);

        let cu = transitions(29).unwrap();
        let ka1 = cu.iter().find(|t| t.transition == "Ka1").unwrap();
        assert!((ka1.energy_ev - 8047.78).abs() < 1e-6);

        let mn = transitions(25).unwrap();
        let ka1 = mn.iter().find(|t| t.transition == "Ka1").unwrap();
        assert!((ka1.energy_ev - 5898.75).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_element() {
        // 氢没有特征 X 射线数据
        assert!(transitions(1).is_none());
        assert!(edges(1).is_none());
    }

    #[test]
    fn test_edges_present() {
        let si = edges(14).unwrap();
        assert_eq!(si.len(), 1);
        assert_eq!(si[0].subshell, "K");
        assert!((si[0].energy_ev - 1839.0).abs() < 1e-6);

        let cu = edges(29).unwrap();
        assert!(cu.iter().any(|e| e.subshell == "L3"));
    }

    #[test]
    fn test_fractions_positive() {
        for lines in XRAY_TRANSITIONS.values() {
            for line in lines {
                assert!(line.fraction > 0.0, "fraction must be positive: {}", line.transition);
                assert!(line.energy_ev > 0.0, "energy must be positive: {}", line.transition);
            }
        }
    }
}
