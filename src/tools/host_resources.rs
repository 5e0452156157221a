use sysinfo::System;

/// 主機資源資訊
///
/// 啟動時偵測一次，之後以參數傳給各元件；測試可直接建構任意大小的主機。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostResources {
    pub cpu_count: usize,
}

impl HostResources {
    #[must_use]
    pub const fn new(cpu_count: usize) -> Self {
        Self { cpu_count }
    }

    /// 以 sysinfo 取得邏輯 CPU 數量
    #[must_use]
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self::new(system.cpus().len().max(1))
    }

    /// x265 執行緒池大小：約三分之一 CPU，至少 1
    ///
    /// 保留其餘 CPU 給流程本身與平行的音訊編碼。
    #[must_use]
    pub const fn encoder_pool_size(&self) -> usize {
        let pool = self.cpu_count / 3;
        if pool == 0 { 1 } else { pool }
    }
}
