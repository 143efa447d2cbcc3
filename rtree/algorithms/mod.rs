// R-tree算法模块
//
// 这个模块包含R-tree的所有核心算法实现，按功能分解为不同的子模块：
// - search: 范围查询和半径查询
// - insert: 插入和子树选择
// - split: 二次分裂算法
// - delete: 删除和MBR收缩
// - knn: K-最近邻搜索算法
// - debug: 统计、不变量检查和可视化导出
// - concurrent: 并发安全的R-tree包装（使用 std::sync）

pub mod concurrent;
pub mod debug;
pub mod delete;
pub mod insert;
pub mod knn;
pub mod search;
pub mod split;
